//! Telco client: one method per logical QoD operation.
//!
//! Every call resolves the dialect, builds the upstream request, acquires a
//! token, sends, and normalizes. Nothing is retried.

pub mod upstream;

use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::auth::{AcquiredToken, AdminRealm, TokenBroker, TokenFlow};
use crate::cache::token_cache::TokenCache;
use crate::config::credentials::Credentials;
use crate::config::settings::{HttpConfig, TokenCacheConfig};
use crate::config::telco::SessionFlow;
use crate::dialect::{
    build_request, normalize_session_created, ApiVersion, Operation, Resource, SessionCreated,
    UpstreamRequest,
};
use crate::errors::{TelcoError, TelcoResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::telco::upstream::UpstreamResponse;

#[derive(Debug)]
pub struct TelcoClient {
    client: Client,
    credentials: Arc<Credentials>,
    broker: TokenBroker,
}

impl TelcoClient {
    pub fn new(
        credentials: Arc<Credentials>,
        http: &HttpConfig,
        token_cache: &TokenCacheConfig,
    ) -> TelcoResult<Self> {
        let client = Client::builder()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()
            .map_err(|e| TelcoError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        let cache = if token_cache.enabled {
            info!(
                "token cache enabled, safety margin {}s",
                token_cache.safety_margin_seconds
            );
            Some(TokenCache::new(token_cache.safety_margin_seconds))
        } else {
            None
        };

        let broker = TokenBroker::new(client.clone(), credentials.clone(), cache);
        Ok(Self { client, credentials, broker })
    }

    // -------------------------------
    // Sessions
    // -------------------------------

    /// `None` when the upstream did not answer with the dialect's create status and an id.
    pub async fn create_session(&self, payload: &Value) -> TelcoResult<Option<SessionCreated>> {
        let version = self.api_version()?;
        let response = self
            .execute(Resource::Session, Operation::Create(payload.clone()))
            .await?;
        Ok(normalize_session_created(version, response.status, response.body.as_ref()))
    }

    pub async fn get_session(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::Session, Operation::Get(id.to_string())).await
    }

    pub async fn delete_session(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::Session, Operation::Delete(id.to_string())).await
    }

    // -------------------------------
    // Purposes
    // -------------------------------

    pub async fn create_purpose(&self, payload: &Value) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::Purpose, Operation::Create(payload.clone())).await
    }

    pub async fn get_purpose(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::Purpose, Operation::Get(id.to_string())).await
    }

    pub async fn delete_purpose(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::Purpose, Operation::Delete(id.to_string())).await
    }

    // -------------------------------
    // Apps
    // -------------------------------

    pub async fn create_app(&self, payload: &Value) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::App, Operation::Create(payload.clone())).await
    }

    pub async fn get_app(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::App, Operation::Get(id.to_string())).await
    }

    pub async fn delete_app(&self, id: &str) -> TelcoResult<UpstreamResponse> {
        self.execute(Resource::App, Operation::Delete(id.to_string())).await
    }

    fn api_version(&self) -> TelcoResult<ApiVersion> {
        self.credentials.api_version.parse()
    }

    /// Token flow for an operation; admin resources need their realm configured.
    fn token_flow(&self, resource: Resource, operation: &Operation) -> TelcoResult<TokenFlow> {
        let realm = match resource {
            Resource::Session => {
                return Ok(match self.credentials.session_flow {
                    SessionFlow::ClientCredentials => TokenFlow::ClientCredentials,
                    SessionFlow::Ciba => TokenFlow::Ciba,
                });
            }
            Resource::Purpose => AdminRealm::Purpose,
            Resource::App => AdminRealm::App,
        };

        let admin = match realm {
            AdminRealm::Purpose => self.credentials.purpose.as_ref(),
            AdminRealm::App => self.credentials.app.as_ref(),
        }
        .ok_or_else(|| {
            TelcoError::Configuration(format!("no {} admin credentials configured", realm.as_str()))
        })?;

        let scope = match operation {
            Operation::Create(_) => Some(&admin.scopes.create),
            Operation::Get(_) => Some(&admin.scopes.read),
            Operation::Delete(_) => admin.scopes.delete.as_ref(),
        }
        .ok_or_else(|| {
            TelcoError::Configuration(format!("no {} delete scope configured", realm.as_str()))
        })?;

        Ok(TokenFlow::scoped(realm, scope.to_owned()))
    }

    async fn execute(&self, resource: Resource, operation: Operation) -> TelcoResult<UpstreamResponse> {
        let metrics = get_metrics().await;
        let labels = [resource.as_str(), operation.as_str()];

        let result = self.dispatch(resource, &operation).await;
        match &result {
            Ok(response) => {
                metrics
                    .upstream_requests
                    .with_label_values(&[labels[0], labels[1], response.status.as_str()])
                    .inc();
            }
            Err(e) => {
                error!("{} {} failed: {}", labels[1], labels[0], e);
                metrics
                    .upstream_failures
                    .with_label_values(&[labels[0], labels[1], e.reason()])
                    .inc();
            }
        }
        result
    }

    async fn dispatch(&self, resource: Resource, operation: &Operation) -> TelcoResult<UpstreamResponse> {
        // configuration problems surface before any network call
        let version = self.api_version()?;
        let request = build_request(resource, operation, version, &self.credentials)?;
        let flow = self.token_flow(resource, operation)?;

        let acquired = self.broker.acquire_token(&flow).await?;
        let response = self.send(resource, operation, &request, &acquired).await?;

        if acquired.cached && response.status == StatusCode::UNAUTHORIZED {
            warn!("cached {} token rejected by upstream, invalidating", flow.label());
            self.broker.invalidate(&flow).await;
            return Err(TelcoError::Authentication(format!(
                "cached {} token was rejected",
                flow.label()
            )));
        }

        Ok(response)
    }

    async fn send(
        &self,
        resource: Resource,
        operation: &Operation,
        request: &UpstreamRequest,
        acquired: &AcquiredToken,
    ) -> TelcoResult<UpstreamResponse> {
        let url = self.credentials.api_url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(AUTHORIZATION, acquired.token.bearer());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = get_instant();
        let response = builder.send().await?;
        let response = UpstreamResponse::read(response).await?;
        get_metrics()
            .await
            .upstream_duration
            .with_label_values(&[resource.as_str(), operation.as_str()])
            .observe(started.elapsed().as_secs_f64());

        debug!("{} {} answered {}", request.method, url, response.status);
        Ok(response)
    }
}
