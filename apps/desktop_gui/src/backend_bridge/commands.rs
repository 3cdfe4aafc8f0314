//! Backend commands queued from UI to backend worker.

use shared::domain::{UserDraft, UserId};

pub enum BackendCommand {
    /// The search box changed; the controller debounces these.
    SearchChanged { query: String },
    Refresh,
    CreateUser { draft: UserDraft },
    DeleteUser { id: UserId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchChanged { .. } => "search_changed",
            Self::Refresh => "refresh",
            Self::CreateUser { .. } => "create_user",
            Self::DeleteUser { .. } => "delete_user",
        }
    }
}
