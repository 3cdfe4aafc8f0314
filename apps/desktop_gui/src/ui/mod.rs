//! UI layer for desktop GUI: app shell, create form, user rows, and notices.

pub mod app;
pub mod create_form;
pub mod notifications;
pub mod user_row;

pub use app::{StartupConfig, UsersApp};
