use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Recommendation, SubjectId, TimeWindow};
use super::repository::{FeatureAggregator, WellbeingRepository};
use super::service::{AlertScan, WellbeingService, WellbeingServiceError};

/// Router builder exposing the score, alert, and recommendation endpoints.
pub fn wellbeing_router<F, R>(service: Arc<WellbeingService<F, R>>) -> Router
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    Router::new()
        .route("/v1/score/compute", post(compute_score_handler::<F, R>))
        .route("/v1/alerts/scan", post(scan_alerts_handler::<F, R>))
        .route("/v1/reco/:subject_id", get(recommendations_handler::<F, R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ComputeScoreRequest {
    pub(crate) user_id: String,
    #[serde(default = "default_time_window")]
    pub(crate) time_window: String,
}

fn default_time_window() -> String {
    "7d".to_string()
}

#[derive(Debug, Serialize)]
struct ComputeScoreResponse {
    score: u8,
    trend: Option<i16>,
    explanation: ExplanationView,
    computed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ExplanationView {
    rules: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScanAlertsRequest {
    pub(crate) user_id: String,
}

pub(crate) async fn compute_score_handler<F, R>(
    State(service): State<Arc<WellbeingService<F, R>>>,
    Json(request): Json<ComputeScoreRequest>,
) -> Response
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    let window = match TimeWindow::parse(&request.time_window) {
        Ok(window) => window,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let subject = SubjectId(request.user_id);
    match service.compute_score(&subject, window) {
        Ok(report) => (
            StatusCode::OK,
            Json(ComputeScoreResponse {
                score: report.score,
                trend: report.trend,
                explanation: ExplanationView {
                    rules: report.rule_trace,
                },
                computed_at: report.computed_at,
            }),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn scan_alerts_handler<F, R>(
    State(service): State<Arc<WellbeingService<F, R>>>,
    Json(request): Json<ScanAlertsRequest>,
) -> Response
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    let subject = SubjectId(request.user_id);
    match service.scan_alerts(&subject) {
        Ok(AlertScan::Clear) => {
            let payload = json!({ "created": false, "message": "no alert" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(AlertScan::Created {
            risk_level,
            alert_id,
        }) => {
            let payload = json!({
                "created": true,
                "risk_level": risk_level.label(),
                "alert_id": alert_id.0,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn recommendations_handler<F, R>(
    State(service): State<Arc<WellbeingService<F, R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    let subject = SubjectId(subject_id);
    match service.recommendations(&subject) {
        Ok(recommendations) => {
            (StatusCode::OK, Json::<Vec<Recommendation>>(recommendations)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(error: WellbeingServiceError) -> Response {
    let status = match &error {
        WellbeingServiceError::NoRecentCheckins => StatusCode::NOT_FOUND,
        WellbeingServiceError::Aggregate(_) | WellbeingServiceError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
