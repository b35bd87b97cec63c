use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::dtos::{ContactAck, ContactSubmission};
use crate::startup::AppState;
use crate::utils::{ClientContext, ValidatedJson};

#[tracing::instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    client: ClientContext,
    ValidatedJson(submission): ValidatedJson<ContactSubmission>,
) -> Result<Json<ContactAck>, AppError> {
    let ack = state.intake.submit(submission, client).await?;
    Ok(Json(ack))
}
