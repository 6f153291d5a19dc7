//! In-memory mirror of the server's event collection.

use shared::domain::{Event, EventId};

#[derive(Debug, Default, Clone)]
pub struct EventModel {
    events: Vec<Event>,
}

impl EventModel {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn delete_event(&mut self, id: &EventId) {
        self.events.retain(|event| &event.id != id);
    }

    /// Replaces the stored event with the same id, keeping its position.
    pub fn edit_event(&mut self, id: &EventId, event: Event) -> bool {
        match self.events.iter_mut().find(|existing| &existing.id == id) {
            Some(slot) => {
                *slot = event;
                true
            }
            None => false,
        }
    }

    /// Keeps only the events whose id matches, dropping everything else.
    ///
    /// This narrows the collection in place; use [`EventModel::event`] to look
    /// an event up without losing the rest.
    pub fn narrow_to_id(&mut self, id: &EventId) {
        self.events.retain(|event| &event.id == id);
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
