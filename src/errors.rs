use thiserror::Error;

/// Failures surfaced by the telco client to its callers.
///
/// Upstream non-success answers on `get`/`delete` (and on purpose/app
/// creation) are not errors: they are relayed through
/// [`UpstreamResponse`](crate::telco::upstream::UpstreamResponse).
#[derive(Error, Debug)]
pub enum TelcoError {
    /// Missing or invalid setting, unsupported API version or resource.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token endpoint refused the request or answered without the expected field.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The identity assertion could not be signed.
    #[error("assertion signing failed: {0}")]
    Signing(String),

    /// The resource call itself failed at the HTTP layer.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl TelcoError {
    pub fn reason(&self) -> &'static str {
        match self {
            TelcoError::Configuration(_) => "configuration",
            TelcoError::Authentication(_) => "authentication",
            TelcoError::Signing(_) => "signing",
            TelcoError::Transport(_) => "transport",
        }
    }
}

pub type TelcoResult<T> = std::result::Result<T, TelcoError>;
