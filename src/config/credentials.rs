use std::fmt;
use std::fs;

use tracing::{info, warn};

use crate::config::telco::{
    ClientPair, EndpointsConfig, LoginHint, ScopedClient, SessionFlow, TelcoConfig,
};

/// Immutable credential bundle shared read-only by every operation.
///
/// Built once at startup from [`TelcoConfig`]; key material is read from disk
/// here and never again mid-request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_version: String,
    pub session_flow: SessionFlow,
    pub auth_server_url: String,
    pub api_base_url: String,
    pub endpoints: EndpointsConfig,
    pub session: ClientPair,
    pub purpose: Option<ScopedClient>,
    pub app: Option<ScopedClient>,
    pub assertion: Option<AssertionMaterial>,
    pub gateway_subject_name: Option<String>,
}

/// Everything the assertion signer needs.
#[derive(Clone)]
pub struct AssertionMaterial {
    pub issuer: String,
    pub key_id: Option<String>,
    pub purpose: String,
    pub validity_seconds: i64,
    pub login_hint: LoginHint,
    /// `None` when the key file could not be read; signing then fails per request
    pub private_key_pem: Option<Vec<u8>>,
}

impl fmt::Debug for AssertionMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionMaterial")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .field("purpose", &self.purpose)
            .field("validity_seconds", &self.validity_seconds)
            .field("login_hint", &self.login_hint)
            .field(
                "private_key_pem",
                &self.private_key_pem.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Credentials {
    pub fn from_config(cfg: &TelcoConfig) -> Self {
        let assertion = cfg.ciba.as_ref().map(|ciba| {
            let private_key_pem = match fs::read(&ciba.private_key_path) {
                Ok(pem) => {
                    info!("signing key loaded from {}", ciba.private_key_path);
                    Some(pem)
                }
                Err(err) => {
                    warn!(
                        "signing key {} is not readable, CIBA operations will fail: {}",
                        ciba.private_key_path, err
                    );
                    None
                }
            };
            AssertionMaterial {
                issuer: ciba.issuer.to_owned(),
                key_id: ciba.key_id.to_owned(),
                purpose: ciba.purpose.to_owned(),
                validity_seconds: ciba.validity_seconds,
                login_hint: ciba.login_hint.to_owned(),
                private_key_pem,
            }
        });

        Self {
            api_version: cfg.api_version.trim().to_owned(),
            session_flow: cfg.session_flow,
            auth_server_url: trim_base(&cfg.auth_server_url),
            api_base_url: trim_base(&cfg.api_base_url),
            endpoints: cfg.endpoints.to_owned(),
            session: cfg.session.to_owned(),
            purpose: cfg.purpose.to_owned(),
            app: cfg.app.to_owned(),
            assertion,
            gateway_subject_name: cfg
                .gateway_headers
                .as_ref()
                .map(|headers| headers.subject_name.to_owned()),
        }
    }

    pub fn token_url(&self) -> String {
        join(&self.auth_server_url, &self.endpoints.token_path)
    }

    pub fn bc_authorize_url(&self) -> String {
        join(&self.auth_server_url, &self.endpoints.bc_authorize_path)
    }

    pub fn client_credentials_url(&self) -> String {
        join(&self.auth_server_url, &self.endpoints.client_credentials_path)
    }

    pub fn api_url(&self, path: &str) -> String {
        join(&self.api_base_url, path)
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn join(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
