use http::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use crate::auth::assertion::AssertionSigner;
use crate::auth::basic_credential;
use crate::auth::response::{access_token, parse_json, required_str, send};
use crate::cache::token::AccessToken;
use crate::config::credentials::Credentials;
use crate::errors::{TelcoError, TelcoResult};
use crate::utils::constants::{FIELD_AUTH_REQ_ID, GRANT_CIBA};

static BC_AUTHORIZE_STEP: &str = "backchannel authorization";
static CIBA_TOKEN_STEP: &str = "ciba token";

/// Two-step CIBA grant: `bc-authorize` with a signed login hint, then `token` with the `auth_req_id`.
///
/// Both steps authenticate with the session app's Basic credential. A single
/// token request is made; a pending consent surfaces as an authentication failure.
pub async fn fetch(
    client: &Client,
    credentials: &Credentials,
    signer: &AssertionSigner,
) -> TelcoResult<AccessToken> {
    let material = credentials.assertion.as_ref().ok_or_else(|| {
        TelcoError::Configuration("CIBA flow requires a 'ciba' configuration block".to_string())
    })?;

    let login_hint_token = signer.sign()?;
    let basic = basic_credential(&credentials.session);

    // -------------------------------
    // 1. bc-authorize
    // -------------------------------

    let form = [
        ("login_hint_token", login_hint_token.as_str()),
        ("purpose", material.purpose.as_str()),
    ];
    let request = client
        .post(credentials.bc_authorize_url())
        .header(AUTHORIZATION, basic.as_str())
        .form(&form);
    let response = send(request, BC_AUTHORIZE_STEP).await?;
    let body = parse_json(response, BC_AUTHORIZE_STEP).await?;
    let auth_req_id = required_str(&body, FIELD_AUTH_REQ_ID, BC_AUTHORIZE_STEP)?;
    debug!("backchannel authorization accepted");

    // -------------------------------
    // 2. token
    // -------------------------------

    let form = [("grant_type", GRANT_CIBA), ("auth_req_id", auth_req_id.as_str())];
    let request = client
        .post(credentials.token_url())
        .header(AUTHORIZATION, basic.as_str())
        .form(&form);
    let response = send(request, CIBA_TOKEN_STEP).await?;
    let body = parse_json(response, CIBA_TOKEN_STEP).await?;
    access_token(&body, CIBA_TOKEN_STEP)
}
