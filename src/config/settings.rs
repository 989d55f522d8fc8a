use serde::Deserialize;
use std::time::Duration;

use crate::utils::constants::{
    DEFAULT_HTTP_CONNECT_TIMEOUT_MS, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_METRICS_PATH,
    DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub token_cache: TokenCacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    /// static JWKS document published at `/jwks`
    pub jwks_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

/// Bounds for every outbound call (token endpoints and QoD resources).
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Opt-in token reuse. Off by default: every operation fetches its own token.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenCacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// token is dropped this many seconds before its `expires_in` elapses
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            safety_margin_seconds: default_safety_margin_seconds(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    DEFAULT_METRICS_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_HTTP_CONNECT_TIMEOUT_MS
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_TOKEN_SAFETY_MARGIN_SECS
}
