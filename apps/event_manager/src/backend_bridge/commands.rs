//! Backend commands queued from UI to backend worker.

use shared::{domain::EventId, protocol::EventPayload};

use crate::ui::view::FormId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadEvents,
    CreateEvent {
        form_id: FormId,
        payload: EventPayload,
    },
    UpdateEvent {
        form_id: FormId,
        id: EventId,
        payload: EventPayload,
    },
    DeleteEvent {
        id: EventId,
    },
    /// Fresh list fetch feeding the expired-event sweep.
    FetchSweepCandidates,
    /// Deletes run one after another; the first failure stops the rest.
    DeleteExpired {
        ids: Vec<EventId>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadEvents => "load_events",
            Self::CreateEvent { .. } => "create_event",
            Self::UpdateEvent { .. } => "update_event",
            Self::DeleteEvent { .. } => "delete_event",
            Self::FetchSweepCandidates => "fetch_sweep_candidates",
            Self::DeleteExpired { .. } => "delete_expired",
        }
    }
}
