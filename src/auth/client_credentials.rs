use http::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use crate::auth::response::{access_token, parse_json, send};
use crate::auth::{basic_credential, AdminRealm};
use crate::cache::token::AccessToken;
use crate::config::credentials::Credentials;
use crate::errors::{TelcoError, TelcoResult};
use crate::utils::constants::GRANT_CLIENT_CREDENTIALS;

static CLIENT_CREDENTIALS_STEP: &str = "client credentials token";
static SCOPED_ADMIN_STEP: &str = "scoped admin token";

/// Plain client-credentials grant with the session app's id and secret in the form body.
pub async fn fetch(client: &Client, credentials: &Credentials) -> TelcoResult<AccessToken> {
    let form = [
        ("grant_type", GRANT_CLIENT_CREDENTIALS),
        ("client_id", credentials.session.client_id.as_str()),
        ("client_secret", credentials.session.client_secret.as_str()),
    ];
    let request = client.post(credentials.client_credentials_url()).form(&form);

    let response = send(request, CLIENT_CREDENTIALS_STEP).await?;
    let body = parse_json(response, CLIENT_CREDENTIALS_STEP).await?;
    access_token(&body, CLIENT_CREDENTIALS_STEP)
}

/// Client-credentials grant with an admin Basic credential and an explicit scope.
pub async fn fetch_scoped(
    client: &Client,
    credentials: &Credentials,
    realm: AdminRealm,
    scope: &str,
) -> TelcoResult<AccessToken> {
    let admin = match realm {
        AdminRealm::Purpose => credentials.purpose.as_ref(),
        AdminRealm::App => credentials.app.as_ref(),
    }
    .ok_or_else(|| {
        TelcoError::Configuration(format!("no {} admin credentials configured", realm.as_str()))
    })?;

    debug!("requesting {} admin token with scope '{}'", realm.as_str(), scope);
    let form = [("grant_type", GRANT_CLIENT_CREDENTIALS), ("scope", scope)];
    let request = client
        .post(credentials.token_url())
        .header(AUTHORIZATION, basic_credential(&admin.credentials))
        .form(&form);

    let response = send(request, SCOPED_ADMIN_STEP).await?;
    let body = parse_json(response, SCOPED_ADMIN_STEP).await?;
    access_token(&body, SCOPED_ADMIN_STEP)
}
