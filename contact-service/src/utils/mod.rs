pub mod client_context;
pub mod validation;

pub use client_context::ClientContext;
pub use validation::ValidatedJson;
