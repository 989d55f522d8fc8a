use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::settings::SettingsConfig;
use crate::utils::constants::{
    ASSERTION_VALIDITY_SECS, DEFAULT_BC_AUTHORIZE_PATH, DEFAULT_CLIENT_CREDENTIALS_PATH,
    DEFAULT_TOKEN_PATH,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub telco: TelcoConfig,
}

/// ================================
/// Upstream telco
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TelcoConfig {
    /// resolved into a dialect per request, e.g. qod-v0, qod-rc-v1, mec-qos-v1
    pub api_version: String,
    #[serde(default)]
    pub session_flow: SessionFlow,
    pub auth_server_url: String,
    pub api_base_url: String,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// app credentials used for session tokens (client credentials or CIBA)
    pub session: ClientPair,
    /// admin credentials for purpose management
    pub purpose: Option<ScopedClient>,
    /// admin credentials for app registration
    pub app: Option<ScopedClient>,
    pub ciba: Option<CibaConfig>,
    pub gateway_headers: Option<GatewayHeadersConfig>,
}

/// Flow used to obtain tokens for session operations.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFlow {
    ClientCredentials,
    #[default]
    Ciba,
}

/// Token endpoint paths, relative to `auth_server_url`.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_bc_authorize_path")]
    pub bc_authorize_path: String,
    #[serde(default = "default_client_credentials_path")]
    pub client_credentials_path: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
            bc_authorize_path: default_bc_authorize_path(),
            client_credentials_path: default_client_credentials_path(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct ClientPair {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPair")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScopedClient {
    #[serde(flatten)]
    pub credentials: ClientPair,
    pub scopes: OperationScopes,
}

/// Scope strings requested per operation on an administrative resource.
#[derive(Debug, Deserialize, Clone)]
pub struct OperationScopes {
    pub create: String,
    pub read: String,
    /// purposes may be registered without a delete scope
    pub delete: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CibaConfig {
    pub issuer: String,
    pub private_key_path: String,
    pub key_id: Option<String>,
    /// purpose string sent with the backchannel authorization request
    pub purpose: String,
    #[serde(default = "default_validity_seconds")]
    pub validity_seconds: i64,
    pub login_hint: LoginHint,
}

/// Subject the assertion speaks for. Taken from configuration, not from the request.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoginHint {
    #[serde(rename = "type")]
    pub hint_type: SubjectType,
    pub value: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    PhoneNumber,
    Ip,
}

/// Extra headers demanded by the MEC controller gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayHeadersConfig {
    pub subject_name: String,
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}

fn default_bc_authorize_path() -> String {
    DEFAULT_BC_AUTHORIZE_PATH.to_string()
}

fn default_client_credentials_path() -> String {
    DEFAULT_CLIENT_CREDENTIALS_PATH.to_string()
}

fn default_validity_seconds() -> i64 {
    ASSERTION_VALIDITY_SECS
}
