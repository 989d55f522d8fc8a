//! Shared constants and wire literals

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_TOKEN_SAFETY_MARGIN_SECS: u64 = 30;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// Identity assertion lifetime
pub const ASSERTION_VALIDITY_SECS: i64 = 10_000;
pub const MAX_ASSERTION_VALIDITY_SECS: i64 = 86_400;

// Token endpoint defaults
pub const DEFAULT_TOKEN_PATH: &str = "/token";
pub const DEFAULT_BC_AUTHORIZE_PATH: &str = "/bc-authorize";
pub const DEFAULT_CLIENT_CREDENTIALS_PATH: &str = "/oauth/client_credential/accesstoken";

// OAuth grant types
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_CIBA: &str = "urn:openid:params:grant-type:ciba";

// Token endpoint response fields
pub const FIELD_ACCESS_TOKEN: &str = "access_token";
pub const FIELD_AUTH_REQ_ID: &str = "auth_req_id";
pub const FIELD_EXPIRES_IN: &str = "expires_in";

// Supported API version tags
pub const API_VERSION_QOD_V0: &str = "qod-v0";
pub const API_VERSION_QOD_RC_V1: &str = "qod-rc-v1";
pub const API_VERSION_MEC_QOS_V1: &str = "mec-qos-v1";
