use super::*;

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use shared::domain::NewUser;

struct FakeUsersApi {
    users: Mutex<Vec<User>>,
    list_calls: Mutex<Vec<String>>,
    created: Mutex<Vec<NewUser>>,
    deleted: Mutex<Vec<UserId>>,
    delays: HashMap<String, Duration>,
    fail_list: AtomicBool,
    fail_mutations: AtomicBool,
}

impl FakeUsersApi {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            list_calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            delays: HashMap::new(),
            fail_list: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
        }
    }

    fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().expect("calls").clone()
    }

    fn clear_list_calls(&self) {
        self.list_calls.lock().expect("calls").clear();
    }
}

#[async_trait]
impl UsersApi for FakeUsersApi {
    async fn list_users(&self, query: &str) -> Result<Vec<User>, ClientError> {
        self.list_calls
            .lock()
            .expect("calls")
            .push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                message: None,
            });
        }
        let needle = query.to_lowercase();
        Ok(self
            .users
            .lock()
            .expect("users")
            .iter()
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<Option<User>, ClientError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: Some("Error al crear usuario".to_string()),
            });
        }
        self.created.lock().expect("created").push(user.clone());
        let mut users = self.users.lock().expect("users");
        let stored = User {
            id: UserId(users.len() as i64 + 100),
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            role: None,
        };
        users.push(stored.clone());
        Ok(Some(stored))
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 404,
                message: Some("Usuario no encontrado".to_string()),
            });
        }
        self.deleted.lock().expect("deleted").push(id);
        self.users.lock().expect("users").retain(|user| user.id != id);
        Ok(())
    }
}

fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: email.to_string(),
        age: None,
        role: None,
    }
}

fn roster() -> Vec<User> {
    vec![
        user(1, "Ana", "ana@x.com"),
        user(2, "Andres", "andres@x.com"),
        user(3, "Bea", "bea@x.com"),
    ]
}

fn names(list: &ListState) -> Vec<&str> {
    list.users.iter().map(|user| user.name.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn typing_burst_fetches_once_with_final_query() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.set_search_query("a").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.set_search_query("an").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    controller.set_search_query("ana").await;

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(fake.list_calls().is_empty(), "fired before quiet period");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fake.list_calls(), vec!["ana".to_string()]);

    let list = controller.snapshot().await;
    assert_eq!(names(&list), vec!["Ana"]);
    assert!(!list.loading);
    assert_eq!(list.error, None);
}

#[tokio::test(start_paused = true)]
async fn start_loads_unfiltered_list_after_debounce() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(fake.list_calls().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fake.list_calls(), vec![String::new()]);
    assert_eq!(controller.snapshot().await.users.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_users_and_reports_error() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.fetch_users("").await;
    assert_eq!(controller.snapshot().await.users.len(), 3);

    fake.fail_list.store(true, Ordering::SeqCst);
    controller.fetch_users("bea").await;

    let list = controller.snapshot().await;
    assert_eq!(list.users.len(), 3, "data must survive a failed fetch");
    assert_eq!(
        list.error.as_deref(),
        Some("The API answered with HTTP 503.")
    );
    assert!(!list.loading);

    fake.fail_list.store(false, Ordering::SeqCst);
    controller.fetch_users("bea").await;
    let list = controller.snapshot().await;
    assert_eq!(names(&list), vec!["Bea"]);
    assert_eq!(list.error, None);
}

#[tokio::test(start_paused = true)]
async fn superseded_slow_response_is_discarded() {
    let fake = Arc::new(
        FakeUsersApi::with_users(roster()).with_delay("bea", Duration::from_millis(300)),
    );
    let controller = UserListController::new(fake.clone());

    let slow = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.fetch_users("bea").await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.fetch_users("an").await;
    assert_eq!(names(&controller.snapshot().await), vec!["Ana", "Andres"]);

    slow.await.expect("slow fetch");
    let list = controller.snapshot().await;
    assert_eq!(names(&list), vec!["Ana", "Andres"]);
    assert!(!list.loading);
}

#[tokio::test(start_paused = true)]
async fn loading_stays_set_until_latest_fetch_settles() {
    let fake = Arc::new(
        FakeUsersApi::with_users(roster())
            .with_delay("ana", Duration::from_millis(50))
            .with_delay("bea", Duration::from_millis(300)),
    );
    let controller = UserListController::new(fake.clone());

    let fast = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.fetch_users("ana").await
        }
    });
    let slow = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.fetch_users("bea").await
        }
    });

    fast.await.expect("fast fetch");
    let list = controller.snapshot().await;
    assert!(list.loading, "newer fetch is still outstanding");
    assert!(list.users.is_empty(), "stale response must not be applied");

    slow.await.expect("slow fetch");
    let list = controller.snapshot().await;
    assert!(!list.loading);
    assert_eq!(names(&list), vec!["Bea"]);
}

#[tokio::test(start_paused = true)]
async fn create_refetches_once_with_current_query() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.set_search_query("an").await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    fake.clear_list_calls();

    let draft = UserDraft {
        name: "Anabel".to_string(),
        email: "anabel@x.com".to_string(),
        age: "41".to_string(),
    };
    let created = controller
        .create_user(&draft)
        .await
        .expect("create")
        .expect("echoed user");

    assert_eq!(created.name, "Anabel");
    assert_eq!(created.age, Some(41));
    assert_eq!(fake.list_calls(), vec!["an".to_string()]);
    assert_eq!(
        names(&controller.snapshot().await),
        vec!["Ana", "Andres", "Anabel"]
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_draft_is_rejected_before_any_request() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    let draft = UserDraft {
        name: String::new(),
        email: "nobody@x.com".to_string(),
        age: String::new(),
    };
    let err = controller.create_user(&draft).await.expect_err("must fail");

    assert!(matches!(err, ClientError::Validation(_)), "{err}");
    assert!(fake.created.lock().expect("created").is_empty());
    assert!(fake.list_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_create_does_not_refetch() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    fake.fail_mutations.store(true, Ordering::SeqCst);
    let controller = UserListController::new(fake.clone());

    let draft = UserDraft {
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        age: String::new(),
    };
    let err = controller.create_user(&draft).await.expect_err("must fail");

    assert_eq!(err.user_message(), "Error al crear usuario");
    assert!(fake.list_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn delete_refetches_once_with_current_query() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());
    controller.fetch_users("").await;
    fake.clear_list_calls();

    controller.delete_user(UserId(2)).await.expect("delete");

    assert_eq!(fake.deleted.lock().expect("deleted").clone(), vec![UserId(2)]);
    assert_eq!(fake.list_calls(), vec![String::new()]);
    assert_eq!(names(&controller.snapshot().await), vec!["Ana", "Bea"]);
}

#[tokio::test(start_paused = true)]
async fn failed_delete_leaves_list_unchanged() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());
    controller.fetch_users("").await;
    let before = controller.snapshot().await;
    fake.clear_list_calls();
    fake.fail_mutations.store(true, Ordering::SeqCst);

    let err = controller
        .delete_user(UserId(2))
        .await
        .expect_err("must fail");

    assert_eq!(err.user_message(), "Usuario no encontrado");
    assert!(fake.list_calls().is_empty());
    assert_eq!(controller.snapshot().await, before);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_search() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.set_search_query("bea").await;
    controller.shutdown();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(fake.list_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_controller_cancels_pending_search() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());

    controller.set_search_query("bea").await;
    drop(controller);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(fake.list_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_loading_then_result() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::new(fake.clone());
    let mut events = controller.subscribe();

    controller.fetch_users("bea").await;

    let ControllerEvent::ListStateChanged(first) = events.recv().await.expect("loading event");
    assert!(first.loading);
    assert_eq!(first.error, None);

    let ControllerEvent::ListStateChanged(second) = events.recv().await.expect("loaded event");
    assert!(!second.loading);
    assert_eq!(names(&second), vec!["Bea"]);
}

#[tokio::test(start_paused = true)]
async fn custom_debounce_is_honoured() {
    let fake = Arc::new(FakeUsersApi::with_users(roster()));
    let controller = UserListController::with_debounce(fake.clone(), Duration::from_millis(50));
    assert_eq!(controller.debounce(), Duration::from_millis(50));

    controller.set_search_query("ana").await;
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(fake.list_calls(), vec!["ana".to_string()]);
}
