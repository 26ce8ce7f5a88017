use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use qvt_ai::workflows::routing::routing_router;
use qvt_ai::workflows::routing::QueryRouter;
use qvt_ai::workflows::wellbeing::{
    wellbeing_router, FeatureAggregator, WellbeingRepository, WellbeingService,
};
use serde_json::json;
use std::sync::Arc;

/// Combine the wellbeing and routing endpoints with the operational routes.
pub(crate) fn with_service_routes<F, R>(
    wellbeing: Arc<WellbeingService<F, R>>,
    router: Arc<QueryRouter<F>>,
) -> axum::Router
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    wellbeing_router(wellbeing)
        .merge(routing_router(router))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
