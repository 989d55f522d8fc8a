use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token broker metrics
    pub token_requests: IntCounterVec,
    pub token_failures: IntCounterVec,
    pub token_duration: HistogramVec,
    pub token_cache_hits: IntCounterVec,

    // Upstream QoD metrics
    pub upstream_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("qodgateway".into()), None)
            .unwrap_or_else(|_| Registry::new());

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token broker
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token acquisitions by flow"), &["flow"]).unwrap(),
            token_failures: IntCounterVec::new(Opts::new("token_failures_total", "Token acquisition failures by flow and reason"), &["flow", "reason"]).unwrap(),
            token_duration: HistogramVec::new(HistogramOpts::new("token_request_duration_seconds", "Token acquisition duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["flow"]).unwrap(),
            token_cache_hits: IntCounterVec::new(Opts::new("token_cache_hits_total", "Tokens served from the cache by flow"), &["flow"]).unwrap(),

            // Upstream
            upstream_requests: IntCounterVec::new(Opts::new("upstream_requests_total", "Upstream QoD calls by resource, operation and status"), &["resource", "operation", "status"]).unwrap(),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Operations aborted before an upstream answer"), &["resource", "operation", "reason"]).unwrap(),
            upstream_duration: HistogramVec::new(HistogramOpts::new("upstream_request_duration_seconds", "Upstream QoD call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["resource", "operation"]).unwrap(),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_requests.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_failures.clone())).unwrap();
        reg.register(Box::new(metrics.upstream_duration.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
