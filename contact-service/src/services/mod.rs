pub mod intake;
pub mod metrics;
pub mod store;

pub use intake::{ContactIntake, IntakeError};
pub use metrics::{get_metrics, init_metrics, record_submission, SubmissionOutcome};
pub use store::{resolve_store, DocumentStore, InMemoryDocumentStore, MongoDocumentStore};
