//! Owns the user list state and drives it: debounced search, refetch after
//! mutations, and discarding of superseded responses.

use std::{
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use shared::domain::{User, UserDraft, UserId};
use tokio::{
    sync::{broadcast, RwLock},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{error::ClientError, UsersApi};

/// Quiet period after the last search edit before the list is refetched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Users in backend order.
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    ListStateChanged(ListState),
}

#[derive(Debug, Default)]
struct ControllerState {
    list: ListState,
    search_query: String,
    /// Sequence number of the most recently issued fetch.
    latest_fetch: u64,
}

pub struct UserListController {
    api: Arc<dyn UsersApi>,
    debounce: Duration,
    state: RwLock<ControllerState>,
    pending_search: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl UserListController {
    pub fn new(api: Arc<dyn UsersApi>) -> Arc<Self> {
        Self::with_debounce(api, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<dyn UsersApi>, debounce: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            api,
            debounce,
            state: RwLock::new(ControllerState::default()),
            pending_search: Mutex::new(None),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Schedules the initial load for the (empty) current query.
    pub async fn start(self: &Arc<Self>) {
        let query = self.search_query().await;
        self.schedule_search(query);
    }

    pub async fn snapshot(&self) -> ListState {
        self.state.read().await.list.clone()
    }

    pub async fn search_query(&self) -> String {
        self.state.read().await.search_query.clone()
    }

    /// Records the new query and (re)arms the debounce timer for it.
    pub async fn set_search_query(self: &Arc<Self>, query: impl Into<String>) {
        let query = query.into();
        self.state.write().await.search_query = query.clone();
        self.schedule_search(query);
    }

    fn schedule_search(self: &Arc<Self>, query: String) {
        let controller: Weak<Self> = Arc::downgrade(self);
        let delay = self.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(controller) = controller.upgrade() else {
                return;
            };
            // Dispatch detached so that aborting a newer timer never cancels
            // a request that is already on the wire.
            tokio::spawn(async move {
                controller.fetch_users(&query).await;
            });
        });

        let previous = self
            .pending_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(timer);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Fetches the list for `query` and stores the outcome.
    ///
    /// Only the most recently issued fetch may touch the list: a response that
    /// settles after a newer fetch was issued is dropped.
    pub async fn fetch_users(&self, query: &str) {
        let sequence = {
            let mut state = self.state.write().await;
            state.latest_fetch += 1;
            state.list.loading = true;
            state.list.error = None;
            self.publish(&state.list);
            state.latest_fetch
        };

        let result = self.api.list_users(query).await;
        if let Err(err) = &result {
            error!(query, "users: failed to fetch list: {err}");
        }

        let mut state = self.state.write().await;
        if sequence != state.latest_fetch {
            debug!(
                query,
                sequence,
                latest = state.latest_fetch,
                "users: discarding superseded list response"
            );
            return;
        }

        match result {
            Ok(users) => {
                state.list.users = users;
                state.list.error = None;
            }
            Err(err) => state.list.error = Some(err.user_message()),
        }
        state.list.loading = false;
        self.publish(&state.list);
    }

    /// Refetches with whatever the search query is right now.
    pub async fn refresh(&self) {
        let query = self.search_query().await;
        self.fetch_users(&query).await;
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<Option<User>, ClientError> {
        let payload = draft.to_new_user()?;
        let created = self.api.create_user(&payload).await.inspect_err(|err| {
            error!(email = %payload.email, "users: create failed: {err}");
        })?;
        info!(email = %payload.email, "users: create acknowledged; refreshing list");
        self.refresh().await;
        Ok(created)
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.api.delete_user(id).await.inspect_err(|err| {
            error!(id = id.0, "users: delete failed: {err}");
        })?;
        info!(id = id.0, "users: delete acknowledged; refreshing list");
        self.refresh().await;
        Ok(())
    }

    /// Cancels the pending debounce timer, if any. Requests already dispatched
    /// run to completion.
    pub fn shutdown(&self) {
        let pending = self
            .pending_search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }

    fn publish(&self, list: &ListState) {
        let _ = self
            .events
            .send(ControllerEvent::ListStateChanged(list.clone()));
    }
}

impl Drop for UserListController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
