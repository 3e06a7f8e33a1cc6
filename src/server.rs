use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::workflows::claims::{
    claims_router, ClaimRepository, ClaimService, NotificationPublisher, ProfileRepository,
};

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

/// Assemble the full application router: operational endpoints plus the
/// claims API, wrapped in the Prometheus request-metrics layer.
pub fn app<R, P, N>(service: Arc<ClaimService<R, P, N>>) -> (Router, Arc<AtomicBool>)
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let ops = OpsState {
        readiness: readiness.clone(),
        metrics: prometheus_handle,
    };

    let router = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops)
        .merge(claims_router(service))
        .layer(prometheus_layer);

    (router, readiness)
}

/// Bind and serve until shutdown.
pub async fn serve(config: &AppConfig, router: Router, readiness: Arc<AtomicBool>) -> Result<(), AppError> {
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "claims triage service ready");

    axum::serve(listener, router).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "ready": true }))).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "ready": false }))).into_response()
    }
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
