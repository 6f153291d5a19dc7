//! Backend worker: owns a tokio runtime and runs queued commands one at a time.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use events_client::EventsApi;
use shared::domain::EventId;
use tracing::{error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};

pub fn launch(
    api: Arc<dyn EventsApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorCategory::Unknown,
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_backend_loop(api, cmd_rx, ui_tx));
    })
}

/// Runs until every command sender is gone.
pub async fn run_backend_loop(
    api: Arc<dyn EventsApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    publish(&ui_tx, UiEvent::Info("Backend worker ready".to_string()));
    while let Ok(cmd) = cmd_rx.recv() {
        let event = execute_command(api.as_ref(), cmd).await;
        publish(&ui_tx, event);
    }
    info!("backend command queue closed; worker exiting");
}

pub async fn execute_command(api: &dyn EventsApi, cmd: BackendCommand) -> UiEvent {
    let name = cmd.name();
    match cmd {
        BackendCommand::LoadEvents => match api.list().await {
            Ok(events) => UiEvent::EventsLoaded(events),
            Err(err) => failure(name, UiErrorContext::LoadEvents, &err),
        },
        BackendCommand::CreateEvent { form_id, payload } => match api.create(&payload).await {
            Ok(event) => {
                info!(id = %event.id, "event created");
                UiEvent::EventCreated { form_id, event }
            }
            Err(err) => failure(name, UiErrorContext::CreateEvent(form_id), &err),
        },
        BackendCommand::UpdateEvent {
            form_id,
            id,
            payload,
        } => match api.update(&id, &payload).await {
            Ok(event) => {
                info!(%id, "event updated");
                UiEvent::EventUpdated { form_id, id, event }
            }
            Err(err) => failure(name, UiErrorContext::UpdateEvent(form_id), &err),
        },
        BackendCommand::DeleteEvent { id } => match api.delete(&id).await {
            Ok(_) => {
                info!(%id, "event deleted");
                UiEvent::EventDeleted { id }
            }
            Err(err) => failure(name, UiErrorContext::DeleteEvent, &err),
        },
        BackendCommand::FetchSweepCandidates => match api.list().await {
            Ok(events) => UiEvent::SweepCandidates(events),
            Err(err) => failure(name, UiErrorContext::SweepExpired, &err),
        },
        BackendCommand::DeleteExpired { ids } => delete_expired(api, name, ids).await,
    }
}

async fn delete_expired(api: &dyn EventsApi, command: &str, ids: Vec<EventId>) -> UiEvent {
    let mut deleted = Vec::with_capacity(ids.len());
    for id in ids {
        if let Err(err) = api.delete(&id).await {
            warn!(command, %id, removed = deleted.len(), "expired-event sweep stopped: {err}");
            return UiEvent::ExpiredDeleted {
                deleted,
                error: Some(UiError::from_client_error(UiErrorContext::SweepExpired, &err)),
            };
        }
        info!(%id, "expired event deleted");
        deleted.push(id);
    }
    UiEvent::ExpiredDeleted {
        deleted,
        error: None,
    }
}

fn failure(command: &str, context: UiErrorContext, err: &events_client::ClientError) -> UiEvent {
    warn!(command, "events api call failed: {err}");
    UiEvent::Error(UiError::from_client_error(context, err))
}

fn publish(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => warn!("backend->ui event queue is full; dropping event"),
        Err(TrySendError::Disconnected(_)) => warn!("ui event queue disconnected"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
