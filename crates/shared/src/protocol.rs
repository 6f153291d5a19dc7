use serde::{Deserialize, Serialize};

/// Request body for creating or updating an event. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
}

impl EventPayload {
    pub fn new(
        event_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.event_name.is_empty() && !self.start_date.is_empty() && !self.end_date.is_empty()
    }
}
