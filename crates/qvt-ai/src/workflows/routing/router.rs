use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::engine::RoutingDecision;
use super::service::QueryRouter;
use crate::workflows::wellbeing::{FeatureAggregator, SubjectId};

/// Router builder exposing the profile-routing endpoint.
pub fn routing_router<F>(router: Arc<QueryRouter<F>>) -> Router
where
    F: FeatureAggregator + 'static,
{
    Router::new()
        .route("/v1/route", post(route_query_handler::<F>))
        .with_state(router)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteQueryRequest {
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[serde(default)]
    pub(crate) provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RouteQueryResponse {
    pub(crate) chosen_profile_id: String,
    pub(crate) explanation: RoutingDecision,
}

pub(crate) async fn route_query_handler<F>(
    State(router): State<Arc<QueryRouter<F>>>,
    Json(request): Json<RouteQueryRequest>,
) -> Response
where
    F: FeatureAggregator + 'static,
{
    if request.question.trim().is_empty() {
        let payload = json!({ "error": "question must not be empty" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let subject = request.user_id.map(SubjectId);
    let decision = router
        .route(
            &request.question,
            subject.as_ref(),
            request.provider.as_deref(),
        )
        .await;

    let response = RouteQueryResponse {
        chosen_profile_id: decision.chosen_profile_id.clone(),
        explanation: decision,
    };
    (StatusCode::OK, Json(response)).into_response()
}
