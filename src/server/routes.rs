use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::TelcoError;
use crate::server::server::AppState;
use crate::telco::upstream::UpstreamResponse;

static WELCOME_MSG: &str = "QoD gateway is running";
static NO_RESULT_MSG: &str = "no result";
static AUTH_FAILED_MSG: &str = "upstream authentication failed";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/jwks", get(jwks))
        .route("/connectivity", post(create_session))
        .route("/connectivity/{id}", get(get_session).delete(delete_session))
        .route("/purposes", post(create_purpose))
        .route("/purposes/{id}", get(get_purpose).delete(delete_purpose))
        .route("/apps", post(create_app))
        .route("/apps/{id}", get(get_app).delete(delete_app))
}

async fn welcome() -> &'static str {
    WELCOME_MSG
}

async fn jwks(State(state): State<AppState>) -> Response {
    match &state.jwks {
        Some(document) => Json(document.as_ref().clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

// -------------------------------
// Sessions
// -------------------------------

async fn create_session(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    match state.telco.create_session(&payload).await {
        Ok(Some(created)) => {
            info!("session {} created", created.id());
            Json(created).into_response()
        }
        Ok(None) => (StatusCode::BAD_GATEWAY, Json(json!({ "error": NO_RESULT_MSG }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.get_session(&id).await)
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.delete_session(&id).await)
}

// -------------------------------
// Purposes
// -------------------------------

async fn create_purpose(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    passthrough(state.telco.create_purpose(&payload).await)
}

async fn get_purpose(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.get_purpose(&id).await)
}

async fn delete_purpose(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.delete_purpose(&id).await)
}

// -------------------------------
// Apps
// -------------------------------

async fn create_app(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    passthrough(state.telco.create_app(&payload).await)
}

async fn get_app(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.get_app(&id).await)
}

async fn delete_app(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    passthrough(state.telco.delete_app(&id).await)
}

fn passthrough(result: Result<UpstreamResponse, TelcoError>) -> Response {
    match result {
        Ok(UpstreamResponse { status, body }) => match body {
            None => status.into_response(),
            Some(Value::String(text)) => (status, text).into_response(),
            Some(value) => (status, Json(value)).into_response(),
        },
        Err(e) => error_response(e),
    }
}

pub fn error_status(error: &TelcoError) -> StatusCode {
    match error {
        TelcoError::Configuration(_) | TelcoError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TelcoError::Authentication(_) => StatusCode::BAD_GATEWAY,
        TelcoError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        TelcoError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: TelcoError) -> Response {
    let status = error_status(&error);
    warn!("request failed with {}: {}", status, error);
    let message = match &error {
        TelcoError::Authentication(_) => AUTH_FAILED_MSG.to_string(),
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}
