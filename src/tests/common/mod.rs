// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;

use crate::config::credentials::Credentials;
use crate::config::settings::{HttpConfig, TokenCacheConfig};
use crate::config::telco::{
    CibaConfig, ClientPair, EndpointsConfig, GatewayHeadersConfig, LoginHint, OperationScopes,
    ScopedClient, SessionFlow, SubjectType, TelcoConfig,
};
use crate::telco::TelcoClient;
use crate::utils::constants::{ASSERTION_VALIDITY_SECS, DEFAULT_CLIENT_CREDENTIALS_PATH};

pub const TEST_PRIVATE_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/test_private.pem");
pub const TEST_PUBLIC_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/test_public.pem");
pub const MALFORMED_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/keys/malformed.pem");

pub const SESSION_CLIENT_ID: &str = "session-app";
pub const SESSION_CLIENT_SECRET: &str = "session-secret";
pub const PURPOSE_CLIENT_ID: &str = "purpose-admin";
pub const PURPOSE_CLIENT_SECRET: &str = "purpose-secret";
pub const APP_CLIENT_ID: &str = "app-admin";
pub const APP_CLIENT_SECRET: &str = "app-secret";
pub const ISSUER: &str = "qod-gateway-test";
pub const PHONE_NUMBER: &str = "+34600000000";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Telco config pointing both the authorization server and the QoD API at `server`.
pub fn telco_config(server: &MockServer, api_version: &str, session_flow: SessionFlow) -> TelcoConfig {
    TelcoConfig {
        api_version: api_version.to_string(),
        session_flow,
        auth_server_url: server.base_url(),
        api_base_url: server.base_url(),
        endpoints: EndpointsConfig::default(),
        session: ClientPair {
            client_id: SESSION_CLIENT_ID.to_string(),
            client_secret: SESSION_CLIENT_SECRET.to_string(),
        },
        purpose: Some(ScopedClient {
            credentials: ClientPair {
                client_id: PURPOSE_CLIENT_ID.to_string(),
                client_secret: PURPOSE_CLIENT_SECRET.to_string(),
            },
            scopes: OperationScopes {
                create: "purpose:create".to_string(),
                read: "purpose:read".to_string(),
                delete: None,
            },
        }),
        app: Some(ScopedClient {
            credentials: ClientPair {
                client_id: APP_CLIENT_ID.to_string(),
                client_secret: APP_CLIENT_SECRET.to_string(),
            },
            scopes: OperationScopes {
                create: "app:create".to_string(),
                read: "app:read".to_string(),
                delete: Some("app:delete".to_string()),
            },
        }),
        ciba: Some(ciba_config(TEST_PRIVATE_KEY)),
        gateway_headers: Some(GatewayHeadersConfig {
            subject_name: "developer-kit".to_string(),
        }),
    }
}

pub fn ciba_config(private_key_path: &str) -> CibaConfig {
    CibaConfig {
        issuer: ISSUER.to_string(),
        private_key_path: private_key_path.to_string(),
        key_id: Some("test-key".to_string()),
        purpose: "dpv:RequestedServiceProvision#qod".to_string(),
        validity_seconds: ASSERTION_VALIDITY_SECS,
        login_hint: LoginHint {
            hint_type: SubjectType::PhoneNumber,
            value: PHONE_NUMBER.to_string(),
        },
    }
}

pub fn credentials(server: &MockServer, api_version: &str, session_flow: SessionFlow) -> Arc<Credentials> {
    Arc::new(Credentials::from_config(&telco_config(server, api_version, session_flow)))
}

pub fn telco_client(credentials: Arc<Credentials>) -> TelcoClient {
    TelcoClient::new(credentials, &HttpConfig::default(), &TokenCacheConfig::default())
        .expect("telco client")
}

pub fn cached_telco_client(credentials: Arc<Credentials>) -> TelcoClient {
    let cache = TokenCacheConfig {
        enabled: true,
        safety_margin_seconds: 30,
    };
    TelcoClient::new(credentials, &HttpConfig::default(), &cache).expect("telco client")
}

/// Client-credentials token endpoint answering with `token`.
pub async fn mock_client_credentials_token<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
    let token = token.to_string();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(DEFAULT_CLIENT_CREDENTIALS_PATH)
                .form_urlencoded_tuple("grant_type", "client_credentials")
                .form_urlencoded_tuple("client_id", SESSION_CLIENT_ID)
                .form_urlencoded_tuple("client_secret", SESSION_CLIENT_SECRET);
            then.status(200)
                .json_body(json!({ "access_token": token, "token_type": "Bearer", "expires_in": 3600 }));
        })
        .await
}

/// Both CIBA steps; returns (bc-authorize mock, token mock).
pub async fn mock_ciba<'a>(server: &'a MockServer, token: &str) -> (Mock<'a>, Mock<'a>) {
    let token = token.to_string();
    let bc_authorize = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/bc-authorize")
                .header("authorization", basic(SESSION_CLIENT_ID, SESSION_CLIENT_SECRET))
                .form_urlencoded_tuple_exists("login_hint_token")
                .form_urlencoded_tuple("purpose", "dpv:RequestedServiceProvision#qod");
            then.status(200)
                .json_body(json!({ "auth_req_id": "req-42", "expires_in": 120, "interval": 2 }));
        })
        .await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .header("authorization", basic(SESSION_CLIENT_ID, SESSION_CLIENT_SECRET))
                .form_urlencoded_tuple("grant_type", "urn:openid:params:grant-type:ciba")
                .form_urlencoded_tuple("auth_req_id", "req-42");
            then.status(200)
                .json_body(json!({ "access_token": token, "token_type": "Bearer", "expires_in": 3600 }));
        })
        .await;
    (bc_authorize, token_mock)
}

/// Scoped admin token endpoint for one (client, scope) pair.
pub async fn mock_scoped_token<'a>(
    server: &'a MockServer,
    client_id: &str,
    client_secret: &str,
    scope: &str,
    token: &str,
) -> Mock<'a> {
    let authorization = basic(client_id, client_secret);
    let scope = scope.to_string();
    let token = token.to_string();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/token")
                .header("authorization", authorization)
                .form_urlencoded_tuple("grant_type", "client_credentials")
                .form_urlencoded_tuple("scope", scope);
            then.status(200).json_body(json!({ "access_token": token }));
        })
        .await
}

pub fn basic(client_id: &str, client_secret: &str) -> String {
    use base64::Engine;
    let raw = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
}
