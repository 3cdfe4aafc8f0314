//! Bridge between the egui thread and the tokio-hosted users controller.

pub mod commands;
pub mod runtime;
