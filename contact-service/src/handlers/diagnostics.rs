use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dtos::ProbeResult;
use crate::services::get_metrics;
use crate::startup::AppState;

/// Storage connectivity probe. Always answers 200; the body says what happened.
pub async fn test_storage(State(state): State<AppState>) -> Json<ProbeResult> {
    Json(state.intake.probe_storage().await)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
