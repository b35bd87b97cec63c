use serde::{Deserialize, Serialize};

/// Outcome of the storage connectivity probe behind `GET /test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            connected: None,
            sample: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn connected(sample: Vec<serde_json::Value>) -> Self {
        Self {
            ok: true,
            connected: Some(true),
            sample: Some(sample),
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            connected: Some(false),
            sample: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
    pub service: String,
    pub version: String,
}
