use axum::Json;
use chrono::{SecondsFormat, Utc};

use crate::dtos::HealthResponse;

/// Liveness probe. Independent of storage state.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        service: "contact-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
