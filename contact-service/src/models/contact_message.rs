use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize};

use crate::dtos::ContactSubmission;
use crate::utils::ClientContext;

/// Collection holding accepted contact form messages.
pub const COLLECTION: &str = "contactmessage";

/// Channel tag stamped on every message received through the website form.
pub const SOURCE_WEBSITE: &str = "website";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    pub source: String,
}

impl ContactMessage {
    /// Build the record for an accepted submission. `now` is the moment of
    /// acceptance, not of storage.
    pub fn from_submission(
        submission: ContactSubmission,
        client: ClientContext,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: submission.name.trim().to_string(),
            phone: submission.phone.trim().to_string(),
            email: submission
                .email
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            message: submission.message.trim().to_string(),
            ip: client.ip,
            user_agent: client.user_agent,
            created_at: now,
            source: SOURCE_WEBSITE.to_string(),
        }
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        bson::to_document(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "  Juan Perez ".to_string(),
            phone: " +34600000000".to_string(),
            email: Some(" juan@example.com  ".to_string()),
            message: "Necesito presupuesto\n".to_string(),
            honeypot: None,
        }
    }

    #[test]
    fn trims_fields_and_stamps_source() {
        let now = Utc::now();
        let client = ClientContext {
            ip: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        };

        let message = ContactMessage::from_submission(submission(), client, now);

        assert_eq!(message.name, "Juan Perez");
        assert_eq!(message.phone, "+34600000000");
        assert_eq!(message.email, "juan@example.com");
        assert_eq!(message.message, "Necesito presupuesto");
        assert_eq!(message.ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(message.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(message.created_at, now);
        assert_eq!(message.source, "website");
    }

    #[test]
    fn missing_email_becomes_empty_string() {
        let mut s = submission();
        s.email = None;

        let message = ContactMessage::from_submission(s, ClientContext::default(), Utc::now());

        assert_eq!(message.email, "");
        assert!(message.ip.is_none());
        assert!(message.user_agent.is_none());
    }

    #[test]
    fn document_uses_bson_datetime_and_nulls() {
        let message =
            ContactMessage::from_submission(submission(), ClientContext::default(), Utc::now());
        let doc = message.to_document().unwrap();

        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));
        assert_eq!(doc.get("ip"), Some(&Bson::Null));
        assert_eq!(doc.get_str("source").unwrap(), "website");
        assert!(doc.get("_id").is_none());
    }
}
