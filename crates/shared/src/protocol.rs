use serde::{Deserialize, Serialize};

use crate::domain::User;

/// Acknowledgement body of mutating endpoints (`POST`/`DELETE /usuarios`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationAck {
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Query string of the list endpoint; `q` is omitted for the unfiltered list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListUsersQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ListUsersQuery {
    pub fn for_search(query: &str) -> Self {
        Self {
            q: (!query.is_empty()).then(|| query.to_string()),
        }
    }
}
