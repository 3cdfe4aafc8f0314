//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, ControllerEvent, HttpUsersApi, UserListController};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::{sync::broadcast, task::JoinHandle};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let api = match HttpUsersApi::from_settings(&settings) {
                Ok(api) => api,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::BackendStartup,
                        &err,
                    )));
                    tracing::error!("backend worker startup failure: {err}");
                    return;
                }
            };

            let controller =
                UserListController::with_debounce(Arc::new(api), settings.search_debounce());
            let event_task = forward_controller_events(controller.subscribe(), ui_tx.clone());
            controller.start().await;
            let _ = ui_tx.try_send(UiEvent::Info(format!("Using API at {}", settings.api_url)));
            tracing::info!(api_url = %settings.api_url, "backend: ready");

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&controller, &ui_tx, cmd).await;
            }

            tracing::info!("backend: command queue closed; shutting down");
            controller.shutdown();
            event_task.abort();
        });
    });
}

/// Relays list state changes from the controller to the UI queue.
pub fn forward_controller_events(
    mut events: broadcast::Receiver<ControllerEvent>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::ListStateChanged(list)) => {
                    let _ = ui_tx.try_send(UiEvent::ListUpdated(list));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "backend: ui lagged behind list updates");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Hands a create/delete outcome to the UI. These events unlock the form or
/// report a failure, so a full queue waits for the UI to drain instead of
/// dropping them.
async fn deliver_outcome(ui_tx: Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!("backend: ui queue full; waiting to deliver mutation outcome");
            let delivered = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
            if !matches!(delivered, Ok(true)) {
                tracing::error!("backend: ui went away before mutation outcome was delivered");
            }
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("backend: ui closed; dropping mutation outcome");
        }
    }
}

/// Applies one UI command. Mutations run as their own task so a slow request
/// never holds up search input; their handle is returned.
pub async fn handle_command(
    controller: &Arc<UserListController>,
    ui_tx: &Sender<UiEvent>,
    cmd: BackendCommand,
) -> Option<JoinHandle<()>> {
    tracing::debug!(command = cmd.name(), "backend: handling command");
    match cmd {
        BackendCommand::SearchChanged { query } => {
            controller.set_search_query(query).await;
            None
        }
        BackendCommand::Refresh => {
            let controller = Arc::clone(controller);
            Some(tokio::spawn(async move { controller.refresh().await }))
        }
        BackendCommand::CreateUser { draft } => {
            let controller = Arc::clone(controller);
            let ui_tx = ui_tx.clone();
            Some(tokio::spawn(async move {
                let event = match controller.create_user(&draft).await {
                    Ok(created) => UiEvent::UserCreated {
                        name: created.map(|user| user.name).unwrap_or(draft.name),
                    },
                    Err(err) => UiEvent::CreateFailed(UiError::from_client_error(
                        UiErrorContext::CreateUser,
                        &err,
                    )),
                };
                deliver_outcome(ui_tx, event).await;
            }))
        }
        BackendCommand::DeleteUser { id } => {
            let controller = Arc::clone(controller);
            let ui_tx = ui_tx.clone();
            Some(tokio::spawn(async move {
                let event = match controller.delete_user(id).await {
                    Ok(()) => UiEvent::UserDeleted { id },
                    Err(err) => UiEvent::DeleteFailed {
                        id,
                        error: UiError::from_client_error(UiErrorContext::DeleteUser, &err),
                    },
                };
                deliver_outcome(ui_tx, event).await;
            }))
        }
    }
}
