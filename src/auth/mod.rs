//! Token broker: obtains a fresh (or still valid cached) access token for each upstream call.

pub mod assertion;
pub mod ciba;
pub mod client_credentials;
pub mod response;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use tracing::{debug, error};

use crate::auth::assertion::AssertionSigner;
use crate::cache::token::AccessToken;
use crate::cache::token_cache::TokenCache;
use crate::config::credentials::Credentials;
use crate::config::telco::ClientPair;
use crate::errors::TelcoResult;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

/// Administrative realm a scoped token is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminRealm {
    Purpose,
    App,
}

impl AdminRealm {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRealm::Purpose => "purpose",
            AdminRealm::App => "app",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFlow {
    ClientCredentials,
    Ciba,
    ScopedAdmin { realm: AdminRealm, scope: String },
}

impl TokenFlow {
    pub fn scoped(realm: AdminRealm, scope: impl Into<String>) -> Self {
        TokenFlow::ScopedAdmin { realm, scope: scope.into() }
    }

    /// Metric label, free of scope values.
    pub fn label(&self) -> &'static str {
        match self {
            TokenFlow::ClientCredentials => "client_credentials",
            TokenFlow::Ciba => "ciba",
            TokenFlow::ScopedAdmin { realm: AdminRealm::Purpose, .. } => "purpose_admin",
            TokenFlow::ScopedAdmin { realm: AdminRealm::App, .. } => "app_admin",
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            TokenFlow::ScopedAdmin { scope, .. } => format!("{}:{}", self.label(), scope),
            _ => self.label().to_string(),
        }
    }
}

/// `Basic base64(client_id:client_secret)`.
pub fn basic_credential(pair: &ClientPair) -> String {
    let raw = format!("{}:{}", pair.client_id, pair.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

#[derive(Debug, Clone)]
pub struct AcquiredToken {
    pub token: AccessToken,
    pub cached: bool,
}

#[derive(Debug)]
pub struct TokenBroker {
    client: Client,
    credentials: Arc<Credentials>,
    signer: AssertionSigner,
    cache: Option<TokenCache>,
}

impl TokenBroker {
    pub fn new(client: Client, credentials: Arc<Credentials>, cache: Option<TokenCache>) -> Self {
        let signer = AssertionSigner::new(&credentials);
        Self { client, credentials, signer, cache }
    }

    pub async fn acquire_token(&self, flow: &TokenFlow) -> TelcoResult<AcquiredToken> {
        let metrics = get_metrics().await;
        let label = flow.label();

        if let Some(cache) = &self.cache {
            if let Some(token) = cache.get(&flow.cache_key()).await {
                debug!("using cached {} token", label);
                metrics.token_cache_hits.with_label_values(&[label]).inc();
                return Ok(AcquiredToken { token, cached: true });
            }
        }

        metrics.token_requests.with_label_values(&[label]).inc();
        let started = get_instant();

        let result = match flow {
            TokenFlow::ClientCredentials => {
                client_credentials::fetch(&self.client, &self.credentials).await
            }
            TokenFlow::Ciba => ciba::fetch(&self.client, &self.credentials, &self.signer).await,
            TokenFlow::ScopedAdmin { realm, scope } => {
                client_credentials::fetch_scoped(&self.client, &self.credentials, *realm, scope).await
            }
        };

        metrics
            .token_duration
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        match result {
            Ok(token) => {
                debug!("{} token acquired", label);
                if let Some(cache) = &self.cache {
                    cache.set(&flow.cache_key(), token.clone()).await;
                }
                Ok(AcquiredToken { token, cached: false })
            }
            Err(e) => {
                error!("{} token acquisition failed: {}", label, e);
                metrics.token_failures.with_label_values(&[label, e.reason()]).inc();
                Err(e)
            }
        }
    }

    /// Drop a cached token the upstream rejected.
    pub async fn invalidate(&self, flow: &TokenFlow) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&flow.cache_key()).await;
        }
    }
}
