use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use serde_json::Value;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::routes;
use crate::telco::TelcoClient;

#[derive(Clone)]
pub struct AppState {
    pub telco: Arc<TelcoClient>,
    /// published JWKS document, loaded once at startup
    pub jwks: Option<Arc<Value>>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(telco: Arc<TelcoClient>, jwks: Option<Value>, metrics: &Metrics) -> Self {
        Self {
            telco,
            jwks: jwks.map(Arc::new),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

pub fn router(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .merge(routes::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

pub async fn load_jwks(path: Option<&str>) -> Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = tokio::fs::read_to_string(Path::new(path))
        .await
        .with_context(|| format!("cannot read JWKS document {}", path))?;
    let jwks = serde_json::from_str(&raw)
        .with_context(|| format!("JWKS document {} is not valid JSON", path))?;
    info!("JWKS document loaded from {}", path);
    Ok(Some(jwks))
}

/// Serve the front door until ctrl-c.
pub async fn start(settings_config: &SettingsConfig, telco: Arc<TelcoClient>) -> Result<()> {
    let metrics = get_metrics().await;
    let jwks = load_jwks(settings_config.server.jwks_path.as_deref()).await?;
    let state = AppState::new(telco, jwks, metrics);
    let app = router(state, settings_config);

    let bind_addr = format!(
        "{}:{}",
        settings_config.server.host, settings_config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;
    metrics.up.set(0);

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
