//! UI/backend events and error modeling for the event manager controller.

use events_client::ClientError;
use shared::domain::{Event, EventId};

use crate::ui::view::FormId;

/// Something the user did in the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    NewEventClicked,
    SubmitForm(FormId),
    DiscardForm(FormId),
    EditClicked(EventId),
    DeleteClicked(EventId),
    SweepExpiredClicked,
    ReloadClicked,
    DismissBanner,
}

/// Results reported back by the backend worker.
#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    EventsLoaded(Vec<Event>),
    EventCreated {
        form_id: FormId,
        event: Event,
    },
    EventUpdated {
        form_id: FormId,
        id: EventId,
        event: Event,
    },
    EventDeleted {
        id: EventId,
    },
    SweepCandidates(Vec<Event>),
    /// Outcome of a sweep; `deleted` holds the ids removed before any failure.
    ExpiredDeleted {
        deleted: Vec<EventId>,
        error: Option<UiError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadEvents,
    CreateEvent(FormId),
    UpdateEvent(FormId),
    DeleteEvent,
    SweepExpired,
}

impl UiErrorContext {
    pub fn form_id(self) -> Option<FormId> {
        match self {
            Self::CreateEvent(form_id) | Self::UpdateEvent(form_id) => Some(form_id),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BackendStartup => "Startup",
            Self::LoadEvents => "Loading events",
            Self::CreateEvent(_) => "Saving new event",
            Self::UpdateEvent(_) => "Saving changes",
            Self::DeleteEvent => "Deleting event",
            Self::SweepExpired => "Removing expired events",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Status { .. } => UiErrorCategory::Server,
            ClientError::Decode { .. } => UiErrorCategory::Decode,
            ClientError::InvalidBaseUrl { .. } => UiErrorCategory::Unknown,
        };
        Self::new(category, context, err.to_string())
    }

    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One line for the status bar.
    pub fn summary(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Transport => "server unreachable; check the API URL and retry",
            UiErrorCategory::Server => "server rejected the request",
            UiErrorCategory::Decode => "server sent an unexpected response",
            UiErrorCategory::Unknown => "unexpected failure",
        };
        format!("{} failed: {hint} ({})", self.context.label(), self.message)
    }
}
