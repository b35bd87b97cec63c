use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Contact form payload as posted by the website.
///
/// Length bounds apply to the raw input, before any trimming.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactSubmission {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,
    #[validate(length(min = 6, max = 40, message = "Phone must be 6-40 characters"))]
    pub phone: String,
    #[validate(
        email(message = "Invalid email address"),
        custom(function = "validate_email_domain")
    )]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 4000, message = "Message must be 5-4000 characters"))]
    pub message: String,
    /// Hidden form field; humans leave it empty.
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// Reject single-label domains (`a@b`, `x@localhost`), which the plain
/// `email` rule lets through.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();

    if domain.contains('.') && domain.split('.').all(|label| !label.is_empty()) {
        return Ok(());
    }

    let mut err = ValidationError::new("email_domain");
    err.message = Some(Cow::Borrowed("Email domain must be fully qualified"));
    Err(err)
}

impl ContactSubmission {
    pub fn is_spam(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|value| !value.is_empty())
    }
}

/// Acknowledgment returned by `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ContactAck {
    /// Bare acknowledgment, indistinguishable from a normal success to the sender.
    pub fn accepted() -> Self {
        Self {
            ok: true,
            stored: None,
            id: None,
        }
    }

    pub fn not_stored() -> Self {
        Self {
            ok: true,
            stored: Some(false),
            id: None,
        }
    }

    pub fn stored(id: String) -> Self {
        Self {
            ok: true,
            stored: Some(true),
            id: Some(id),
        }
    }
}
