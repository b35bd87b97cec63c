//! Contact form intake: spam screening, enrichment and persistence.
//!
//! Payloads reach this module already validated. Every outcome except a
//! failed write is reported to the sender as success.

use chrono::Utc;
use mongodb::bson::doc;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

use crate::dtos::{ContactAck, ContactSubmission, ProbeResult};
use crate::models::{ContactMessage, COLLECTION};
use crate::services::metrics::{record_submission, SubmissionOutcome};
use crate::services::store::{document_id, DocumentStore};
use crate::utils::ClientContext;

pub const STORAGE_UNAVAILABLE_MESSAGE: &str =
    "Database helpers not available in this environment";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Failed to store contact message")]
    Persistence(#[source] AppError),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Persistence(cause) => {
                AppError::PersistenceFailure(anyhow::Error::new(cause))
            }
        }
    }
}

#[derive(Clone)]
pub struct ContactIntake {
    store: Option<Arc<dyn DocumentStore>>,
}

impl ContactIntake {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    pub fn storage_configured(&self) -> bool {
        self.store.is_some()
    }

    #[tracing::instrument(skip_all)]
    pub async fn submit(
        &self,
        submission: ContactSubmission,
        client: ClientContext,
    ) -> Result<ContactAck, IntakeError> {
        if submission.is_spam() {
            tracing::debug!("Honeypot filled; dropping submission");
            record_submission(SubmissionOutcome::Spam);
            return Ok(ContactAck::accepted());
        }

        let message = ContactMessage::from_submission(submission, client, Utc::now());

        let Some(store) = self.store.as_ref() else {
            tracing::warn!("Document store not configured; skipping persistence");
            record_submission(SubmissionOutcome::Unstored);
            return Ok(ContactAck::not_stored());
        };

        match self.persist(store.as_ref(), &message).await {
            Ok(id) => {
                tracing::info!(id = %id, "Contact message stored");
                record_submission(SubmissionOutcome::Stored);
                Ok(ContactAck::stored(id))
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to store contact message");
                record_submission(SubmissionOutcome::Failed);
                Err(IntakeError::Persistence(e))
            }
        }
    }

    async fn persist(
        &self,
        store: &dyn DocumentStore,
        message: &ContactMessage,
    ) -> Result<String, AppError> {
        let document = message
            .to_document()
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

        let inserted = store.create_document(COLLECTION, document).await?;
        Ok(document_id(&inserted))
    }

    /// Read one record to prove the store is reachable. Never fails.
    #[tracing::instrument(skip_all)]
    pub async fn probe_storage(&self) -> ProbeResult {
        let Some(store) = self.store.as_ref() else {
            return ProbeResult::unavailable(STORAGE_UNAVAILABLE_MESSAGE);
        };

        match store.get_documents(COLLECTION, doc! {}, 1).await {
            Ok(documents) => ProbeResult::connected(
                documents
                    .into_iter()
                    .map(|d| mongodb::bson::Bson::Document(d).into_relaxed_extjson())
                    .collect(),
            ),
            Err(e) => {
                tracing::error!(error = ?e, "Storage probe failed");
                ProbeResult::failed(e.to_string())
            }
        }
    }
}
