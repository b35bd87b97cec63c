pub mod contact;
pub mod diagnostics;

pub use contact::{ContactAck, ContactSubmission};
pub use diagnostics::{HealthResponse, ProbeResult};
