//! Identity assertion used as the CIBA `login_hint_token`.
//!
//! The assertion is an RS256-signed claim set proving which subject (phone
//! number or IP address) the consent request is about. A new assertion is
//! signed for every authentication attempt; nothing is cached.

use std::sync::atomic::{AtomicI64, Ordering};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::credentials::{AssertionMaterial, Credentials};
use crate::config::telco::{LoginHint, SubjectType};
use crate::errors::{TelcoError, TelcoResult};
use crate::helpers::time::now_i64;

/// Claim set of the identity assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub identifier_type: SubjectType,
    pub identifier: String,
}

#[derive(Debug)]
pub struct AssertionSigner {
    audience: String,
    material: Option<AssertionMaterial>,
    last_issued_at: AtomicI64,
}

impl AssertionSigner {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            audience: credentials.auth_server_url.to_owned(),
            material: credentials.assertion.to_owned(),
            last_issued_at: AtomicI64::new(i64::MIN),
        }
    }

    /// Sign an assertion for the configured subject.
    pub fn sign(&self) -> TelcoResult<String> {
        let material = self.material()?;
        self.sign_for(&material.login_hint)
    }

    /// Sign an assertion for an explicit subject.
    pub fn sign_for(&self, subject: &LoginHint) -> TelcoResult<String> {
        let material = self.material()?;
        let pem = material
            .private_key_pem
            .as_ref()
            .ok_or_else(|| TelcoError::Signing("no signing key loaded".to_string()))?;
        let key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| TelcoError::Signing(format!("malformed RSA private key: {}", e)))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = material.key_id.to_owned();

        let claims = self.claims_for(material, subject)?;
        debug!(
            "signing assertion for {:?}, iat {}, exp {}",
            claims.identifier_type, claims.iat, claims.exp
        );
        encode(&header, &claims, &key)
            .map_err(|e| TelcoError::Signing(format!("cannot sign assertion: {}", e)))
    }

    fn claims_for(&self, material: &AssertionMaterial, subject: &LoginHint) -> TelcoResult<IdentityClaims> {
        let iat = self.next_issued_at(now_i64());
        let exp = iat.checked_add(material.validity_seconds).ok_or_else(|| {
            TelcoError::Signing(format!(
                "assertion validity of {}s overflows the expiry claim",
                material.validity_seconds
            ))
        })?;
        Ok(IdentityClaims {
            aud: self.audience.to_owned(),
            iss: material.issuer.to_owned(),
            iat,
            exp,
            identifier_type: subject.hint_type,
            identifier: subject.value.to_owned(),
        })
    }

    /// `iat` never goes backwards within a process, even if the wall clock does.
    pub(crate) fn next_issued_at(&self, now: i64) -> i64 {
        let previous = self.last_issued_at.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }

    fn material(&self) -> TelcoResult<&AssertionMaterial> {
        self.material
            .as_ref()
            .ok_or_else(|| TelcoError::Signing("no assertion material configured".to_string()))
    }
}
