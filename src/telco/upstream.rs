use http::StatusCode;
use reqwest::Response;
use serde_json::Value;

use crate::errors::TelcoResult;

/// Upstream answer relayed to the caller as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// `None` for an empty body; non-JSON text is kept as a JSON string
    pub body: Option<Value>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub async fn read(response: Response) -> TelcoResult<Self> {
        let status = response.status();
        let text = response.text().await?;
        Ok(Self::new(status, parse_body(&text)))
    }
}

pub fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_owned())),
    }
}
