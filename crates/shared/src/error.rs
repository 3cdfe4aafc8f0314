use serde::{Deserialize, Serialize};

/// Error envelope the users backend returns on 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    /// Best-effort extraction of the backend message from a raw error body.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .map(|parsed| parsed.error)
            .filter(|message| !message.trim().is_empty())
    }
}
