use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::warn;

use crate::cache::token::AccessToken;
use crate::errors::{TelcoError, TelcoResult};
use crate::utils::constants::{FIELD_ACCESS_TOKEN, FIELD_EXPIRES_IN};

/// Send a token-endpoint request; transport failures count as authentication failures.
pub async fn send(request: RequestBuilder, step: &str) -> TelcoResult<Response> {
    request
        .send()
        .await
        .map_err(|e| TelcoError::Authentication(format!("{} request failed: {}", step, e)))
}

/// Read a successful JSON body, anything else is an authentication failure.
pub async fn parse_json(response: Response, step: &str) -> TelcoResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TelcoError::Authentication(format!("{}: cannot read response: {}", step, e)))?;

    if !status.is_success() {
        warn!("{} rejected with status {}: {}", step, status, body);
        return Err(TelcoError::Authentication(format!("{} returned {}", step, status)));
    }

    serde_json::from_str(&body)
        .map_err(|e| TelcoError::Authentication(format!("{}: response is not JSON: {}", step, e)))
}

pub fn required_str(body: &Value, field: &str, step: &str) -> TelcoResult<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| TelcoError::Authentication(format!("{}: response has no '{}'", step, field)))
}

/// `access_token` is mandatory, `expires_in` is read when present (number or numeric string).
pub fn access_token(body: &Value, step: &str) -> TelcoResult<AccessToken> {
    let value = required_str(body, FIELD_ACCESS_TOKEN, step)?;
    let expires_in = body.get(FIELD_EXPIRES_IN).and_then(|field| match field {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    });
    Ok(AccessToken::new(value, expires_in))
}
