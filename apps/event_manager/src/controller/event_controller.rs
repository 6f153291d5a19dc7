//! Wires UI actions to backend commands, and backend results to model and view.
//!
//! Every mutating flow runs in the same order: the server call first, then the
//! model, then the list document. A failed call stops the flow before any local
//! state changes and is reported through the status line and banner.

use chrono::{Local, NaiveDate};
use crossbeam_channel::Sender;
use shared::domain::{Event, EventId};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiAction, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::model::EventModel;
use crate::ui::view::{EventView, FormId, FormKind};

/// Error banner shown above the list until dismissed.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    pub message: String,
}

pub struct EventController {
    model: EventModel,
    view: EventView,
    cmd_tx: Sender<BackendCommand>,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl EventController {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            model: EventModel::default(),
            view: EventView::new(),
            cmd_tx,
            status: "Starting".to_string(),
            status_banner: None,
        }
    }

    /// Initial load of the list.
    pub fn init(&mut self) {
        self.fetch_events();
    }

    pub fn model(&self) -> &EventModel {
        &self.model
    }

    pub fn view(&self) -> &EventView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut EventView {
        &mut self.view
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_banner(&self) -> Option<&StatusBanner> {
        self.status_banner.as_ref()
    }

    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::NewEventClicked => self.open_new_event_form(),
            UiAction::SubmitForm(form_id) => self.submit_form(form_id),
            UiAction::DiscardForm(form_id) => self.discard_form(form_id),
            UiAction::EditClicked(id) => self.open_edit_form(id),
            UiAction::DeleteClicked(id) => self.request_delete(id),
            UiAction::SweepExpiredClicked => self.request_sweep(),
            UiAction::ReloadClicked => self.fetch_events(),
            UiAction::DismissBanner => self.status_banner = None,
        }
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) {
        self.apply_ui_event(event, Local::now().date_naive());
    }

    /// `today` is the reference day for the expired-event sweep.
    pub fn apply_ui_event(&mut self, event: UiEvent, today: NaiveDate) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::EventsLoaded(events) => {
                let count = events.len();
                self.model.set_events(events);
                self.view.render_events(self.model.events());
                self.status = format!("Loaded {count} events");
            }
            UiEvent::EventCreated { form_id, event } => {
                self.model.add_event(event.clone());
                self.view.remove_form(form_id);
                self.view.render_new_event(&event);
                self.status = format!("Added \"{}\"", event.event_name);
            }
            UiEvent::EventUpdated { form_id, id, event } => self.finish_edit(form_id, &id, event),
            UiEvent::EventDeleted { id } => {
                self.forget_event(&id);
                self.status = format!("Deleted event {id}");
            }
            UiEvent::SweepCandidates(events) => self.delete_expired(&events, today),
            UiEvent::ExpiredDeleted { deleted, error } => self.finish_sweep(&deleted, error),
            UiEvent::Error(err) => self.report_error(err),
        }
    }

    fn fetch_events(&mut self) {
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadEvents, &mut self.status) {
            self.status = "Loading events...".to_string();
        }
    }

    fn open_new_event_form(&mut self) {
        let form_id = self.view.create_event_form(FormKind::Create, "", "", "");
        self.view.assign_new_form(form_id);
    }

    fn open_edit_form(&mut self, id: EventId) {
        let Some(event) = self.editable_event(&id) else {
            warn!(%id, "edit requested for an event that is not listed");
            return;
        };
        let form_id = self.view.create_event_form(
            FormKind::Edit(id),
            &event.event_name,
            &event.start_date,
            &event.end_date,
        );
        self.view.assign_new_form(form_id);
    }

    fn editable_event(&self, id: &EventId) -> Option<Event> {
        if let Some(event) = self.model.event(id) {
            return Some(event.clone());
        }
        self.view.row(id).map(|row| Event {
            id: row.id.clone(),
            event_name: row.event_name.clone(),
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
        })
    }

    fn submit_form(&mut self, form_id: FormId) {
        let Some(form) = self.view.form(form_id) else {
            debug!(form = form_id.0, "submit for a form that is gone");
            return;
        };
        if form.pending {
            debug!(form = form_id.0, "save already in flight; ignoring submit");
            return;
        }

        let payload = form.payload();
        if !payload.is_complete() {
            debug!(form = form_id.0, "ignoring submit with empty fields");
            return;
        }

        let cmd = match &form.kind {
            FormKind::Create => BackendCommand::CreateEvent { form_id, payload },
            FormKind::Edit(id) => BackendCommand::UpdateEvent {
                form_id,
                id: id.clone(),
                payload,
            },
        };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            if let Some(form) = self.view.form_mut(form_id) {
                form.pending = true;
            }
            self.status = "Saving...".to_string();
        }
    }

    /// Unsaved forms only exist locally, so closing one never touches the server.
    fn discard_form(&mut self, form_id: FormId) {
        self.view.remove_form(form_id);
    }

    fn finish_edit(&mut self, form_id: FormId, id: &EventId, event: Event) {
        if !self.model.edit_event(id, event.clone()) {
            self.model.add_event(event.clone());
        }
        self.view.remove_form(form_id);
        if !self.view.replace_event_elem(id, &event) {
            self.view.render_new_event(&event);
        }
        self.status = format!("Updated \"{}\"", event.event_name);
    }

    fn request_delete(&mut self, id: EventId) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DeleteEvent { id },
            &mut self.status,
        );
    }

    fn request_sweep(&mut self) {
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchSweepCandidates,
            &mut self.status,
        ) {
            self.status = "Checking for expired events...".to_string();
        }
    }

    fn delete_expired(&mut self, events: &[Event], today: NaiveDate) {
        let expired = self.view.remove_expired_events(events, today);
        if expired.is_empty() {
            self.status = "No expired events".to_string();
            return;
        }

        info!(count = expired.len(), %today, "removing expired events");
        let count = expired.len();
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DeleteExpired { ids: expired },
            &mut self.status,
        ) {
            self.status = format!("Removing {count} expired events...");
        }
    }

    fn finish_sweep(&mut self, deleted: &[EventId], error: Option<UiError>) {
        for id in deleted {
            self.forget_event(id);
        }
        match error {
            Some(err) => self.report_error(err),
            None => self.status = format!("Removed {} expired events", deleted.len()),
        }
    }

    /// Local half of a delete that the server already confirmed.
    fn forget_event(&mut self, id: &EventId) {
        self.model.delete_event(id);
        self.view.remove_event_elem(id);
        let dropped = self.view.remove_edit_forms(id);
        if dropped > 0 {
            debug!(%id, dropped, "closed edit forms for a deleted event");
        }
    }

    fn report_error(&mut self, err: UiError) {
        if let Some(form_id) = err.context().form_id() {
            if let Some(form) = self.view.form_mut(form_id) {
                form.pending = false;
            }
        }
        warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        self.status = err.summary();
        self.status_banner = Some(StatusBanner {
            message: self.status.clone(),
        });
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
