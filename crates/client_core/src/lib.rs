use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{NewUser, User, UserId},
    error::ApiError,
    protocol::{ListUsersQuery, MutationAck},
};
use tracing::{debug, info};

pub mod controller;
pub mod error;
pub mod settings;

pub use controller::{ControllerEvent, ListState, UserListController, SEARCH_DEBOUNCE};
pub use error::ClientError;
pub use settings::ClientSettings;

const USERS_COLLECTION: &str = "usuarios";

/// Operations the users backend exposes on its collection endpoint.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Lists users; an empty `query` means no filter.
    async fn list_users(&self, query: &str) -> Result<Vec<User>, ClientError>;
    /// Creates a user, returning the stored record when the backend echoes it.
    async fn create_user(&self, user: &NewUser) -> Result<Option<User>, ClientError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ClientError>;
}

/// `UsersApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    http: Client,
    base_url: String,
}

impl HttpUsersApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(base_url, Client::new())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(ClientError::Transport)?;
        Self::with_client(&settings.api_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: settings::normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/{USERS_COLLECTION}", self.base_url)
    }

    fn member_url(&self, id: UserId) -> String {
        format!("{}/{USERS_COLLECTION}/{id}", self.base_url)
    }
}

/// Passes 2xx responses through and turns anything else into `ClientError::Status`,
/// keeping the backend's `{"error": ...}` message when it sent one.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: ApiError::message_from_body(&body),
    })
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self, query: &str) -> Result<Vec<User>, ClientError> {
        let response = self
            .http
            .get(self.collection_url())
            .query(&ListUsersQuery::for_search(query))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let users: Vec<User> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        debug!(query, count = users.len(), "users: list fetched");
        Ok(users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<Option<User>, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(user)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let body = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(ClientError::Transport)?;
        let created = serde_json::from_slice::<MutationAck>(&body)
            .ok()
            .and_then(|ack| ack.user);
        info!(
            email = %user.email,
            id = ?created.as_ref().map(|created| created.id.0),
            "users: created"
        );
        Ok(created)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.member_url(id))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        ensure_success(response).await?;
        info!(id = id.0, "users: deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
