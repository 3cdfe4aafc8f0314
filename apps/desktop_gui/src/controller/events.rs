//! Backend-to-UI events and error modeling for the desktop GUI.

use client_core::{ClientError, ListState};
use shared::domain::UserId;

pub enum UiEvent {
    Info(String),
    ListUpdated(ListState),
    UserCreated { name: String },
    CreateFailed(UiError),
    UserDeleted { id: UserId },
    DeleteFailed { id: UserId, error: UiError },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CreateUser,
    DeleteUser,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("required")
            || message_lower.contains("invalid")
            || message_lower.contains("must be")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("http 4") || message_lower.contains("http 5") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::Status { .. } | ClientError::Decode(_) => UiErrorCategory::Server,
            ClientError::Validation(_) => UiErrorCategory::Validation,
            ClientError::InvalidBaseUrl { .. } | ClientError::Settings(_) => {
                UiErrorCategory::Unknown
            }
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
