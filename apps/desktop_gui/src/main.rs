mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::ClientSettings;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, UsersApp};

#[derive(Parser, Debug)]
#[command(name = "users-desktop", about = "Desktop client for the users API")]
struct Args {
    /// Base URL of the users API; overrides API_URL and users_client.toml.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = match args.api_url {
        Some(url) => ClientSettings::global().clone().with_api_url(&url)?,
        None => ClientSettings::global().clone(),
    };
    tracing::info!(api_url = %settings.api_url, "starting users desktop client");

    let startup = StartupConfig::from(&settings);
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Users")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Users",
        options,
        Box::new(|_cc| Ok(Box::new(UsersApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow!("desktop UI failed: {err}"))
}
