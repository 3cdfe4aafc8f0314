//! Client-side error taxonomy for calls against the users API.

use shared::domain::DraftError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the users API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("users API returned HTTP {status}{}", status_detail(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected response from the users API: {0}")]
    Decode(String),
    #[error(transparent)]
    Validation(#[from] DraftError),
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to load client settings: {0}")]
    Settings(#[from] config::ConfigError),
}

fn status_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Short message suitable for showing to the person using the app.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not connect to the API.".to_string(),
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status {
                status,
                message: None,
            } => format!("The API answered with HTTP {status}."),
            Self::Decode(_) => "The API returned an unexpected response.".to_string(),
            Self::Validation(err) => capitalize(&err.to_string()),
            Self::InvalidBaseUrl { .. } | Self::Settings(_) => self.to_string(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
