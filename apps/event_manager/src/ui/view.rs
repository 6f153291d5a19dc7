//! Retained list document: one entry per rendered event row or inline form.
//!
//! The egui layer paints whatever is in here every frame; nothing else owns
//! widget state, so removing an entry is all it takes to drop it from screen.

use chrono::NaiveDate;
use shared::{
    domain::{end_date_passed, Event, EventId},
    protocol::EventPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit(EventId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: EventId,
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub form_id: FormId,
    pub kind: FormKind,
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
    /// Set while a save for this form is in flight.
    pub pending: bool,
}

impl EventForm {
    pub fn payload(&self) -> EventPayload {
        EventPayload::new(&self.event_name, &self.start_date, &self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Row(EventRow),
    Form(EventForm),
}

#[derive(Debug, Default)]
pub struct EventView {
    items: Vec<ListItem>,
    next_form_id: u64,
    new_event_form: Option<FormId>,
}

impl EventView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [ListItem] {
        &mut self.items
    }

    pub fn rows(&self) -> impl Iterator<Item = &EventRow> {
        self.items.iter().filter_map(|item| match item {
            ListItem::Row(row) => Some(row),
            ListItem::Form(_) => None,
        })
    }

    pub fn row(&self, id: &EventId) -> Option<&EventRow> {
        self.rows().find(|row| &row.id == id)
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    pub fn form_count(&self) -> usize {
        self.items.len() - self.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clears the list, inline forms included, and renders one row per event.
    pub fn render_events(&mut self, events: &[Event]) {
        self.items.clear();
        self.new_event_form = None;
        for event in events {
            self.render_new_event(event);
        }
    }

    pub fn render_new_event(&mut self, event: &Event) {
        let row = self.create_event_element(event);
        self.items.push(ListItem::Row(row));
    }

    pub fn remove_event_elem(&mut self, id: &EventId) -> bool {
        match self.row_position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn replace_event_elem(&mut self, id: &EventId, event: &Event) -> bool {
        let Some(index) = self.row_position(id) else {
            return false;
        };
        let row = self.create_event_element(event);
        self.items[index] = ListItem::Row(row);
        true
    }

    pub fn create_event_element(&self, event: &Event) -> EventRow {
        EventRow {
            id: event.id.clone(),
            event_name: event.event_name.clone(),
            start_date: event.start_date.clone(),
            end_date: event.end_date.clone(),
        }
    }

    /// Inserts an inline form. Create forms go to the end of the list; edit
    /// forms sit right below the row they edit.
    pub fn create_event_form(
        &mut self,
        kind: FormKind,
        event_name: &str,
        start_date: &str,
        end_date: &str,
    ) -> FormId {
        let form_id = FormId(self.next_form_id);
        self.next_form_id += 1;

        let insert_at = match &kind {
            FormKind::Edit(id) => self.row_position(id).map(|index| index + 1),
            FormKind::Create => None,
        }
        .unwrap_or(self.items.len());

        self.items.insert(
            insert_at,
            ListItem::Form(EventForm {
                form_id,
                kind,
                event_name: event_name.to_string(),
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
                pending: false,
            }),
        );
        form_id
    }

    /// Points the "current form" handle at a freshly inserted form.
    pub fn assign_new_form(&mut self, form_id: FormId) {
        self.new_event_form = Some(form_id);
    }

    /// Hands out the current form once, for focus placement.
    pub fn take_new_form(&mut self) -> Option<FormId> {
        self.new_event_form.take()
    }

    pub fn form(&self, form_id: FormId) -> Option<&EventForm> {
        self.items.iter().find_map(|item| match item {
            ListItem::Form(form) if form.form_id == form_id => Some(form),
            _ => None,
        })
    }

    pub fn form_mut(&mut self, form_id: FormId) -> Option<&mut EventForm> {
        self.items.iter_mut().find_map(|item| match item {
            ListItem::Form(form) if form.form_id == form_id => Some(form),
            _ => None,
        })
    }

    pub fn remove_form(&mut self, form_id: FormId) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| !matches!(item, ListItem::Form(form) if form.form_id == form_id));
        if self.new_event_form == Some(form_id) {
            self.new_event_form = None;
        }
        self.items.len() != before
    }

    /// Drops every edit form still pointing at `id`; returns how many went.
    pub fn remove_edit_forms(&mut self, id: &EventId) -> usize {
        let stale: Vec<FormId> = self
            .items
            .iter()
            .filter_map(|item| match item {
                ListItem::Form(EventForm {
                    form_id,
                    kind: FormKind::Edit(target),
                    ..
                }) if target == id => Some(*form_id),
                _ => None,
            })
            .collect();
        for form_id in &stale {
            self.remove_form(*form_id);
        }
        stale.len()
    }

    /// Ids of the events whose end date is already behind `today`, in input order.
    pub fn remove_expired_events(&self, events: &[Event], today: NaiveDate) -> Vec<EventId> {
        events
            .iter()
            .filter(|event| self.check_expired_date(today, &event.end_date))
            .map(|event| event.id.clone())
            .collect()
    }

    pub fn check_expired_date(&self, today: NaiveDate, end_date: &str) -> bool {
        end_date_passed(today, end_date)
    }

    fn row_position(&self, id: &EventId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, ListItem::Row(row) if &row.id == id))
    }
}

#[cfg(test)]
#[path = "../tests/view_tests.rs"]
mod tests;
