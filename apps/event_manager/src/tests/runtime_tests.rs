use super::*;
use async_trait::async_trait;
use crossbeam_channel::bounded;
use events_client::{ClientError, ClientResult};
use shared::{
    domain::{Event, EventId},
    protocol::EventPayload,
};
use tokio::sync::Mutex;

use crate::ui::view::FormId;

#[derive(Default)]
struct FakeEventsApi {
    events: Mutex<Vec<Event>>,
    calls: Mutex<Vec<String>>,
    fail_with: Option<String>,
    /// Restricts `fail_with` to this one call when set.
    fail_call: Option<String>,
}

impl FakeEventsApi {
    fn seeded(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn failing_on(call: &str, message: &str, events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            fail_with: Some(message.to_string()),
            fail_call: Some(call.to_string()),
            ..Self::default()
        }
    }

    async fn check(&self, call: String) -> ClientResult<()> {
        let targeted = self.fail_call.as_ref().map_or(true, |fail_call| *fail_call == call);
        self.calls.lock().await.push(call);
        match &self.fail_with {
            Some(message) if targeted => Err(ClientError::Decode {
                url: "http://fake/events".to_string(),
                source: serde_json::from_str::<serde_json::Value>(message)
                    .expect_err("fake failure must not be valid json"),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl EventsApi for FakeEventsApi {
    async fn list(&self) -> ClientResult<Vec<Event>> {
        self.check("list".to_string()).await?;
        Ok(self.events.lock().await.clone())
    }

    async fn create(&self, event: &EventPayload) -> ClientResult<Event> {
        self.check(format!("create {}", event.event_name)).await?;
        let mut events = self.events.lock().await;
        let created = Event {
            id: EventId::from((events.len() + 1).to_string()),
            event_name: event.event_name.clone(),
            start_date: event.start_date.clone(),
            end_date: event.end_date.clone(),
        };
        events.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &EventId) -> ClientResult<serde_json::Value> {
        self.check(format!("delete {id}")).await?;
        self.events.lock().await.retain(|event| &event.id != id);
        Ok(serde_json::json!({}))
    }

    async fn update(&self, id: &EventId, event: &EventPayload) -> ClientResult<Event> {
        self.check(format!("update {id}")).await?;
        Ok(Event {
            id: id.clone(),
            event_name: event.event_name.clone(),
            start_date: event.start_date.clone(),
            end_date: event.end_date.clone(),
        })
    }
}

fn expired(id: &str) -> Event {
    Event {
        id: EventId::from(id),
        event_name: "Old".to_string(),
        start_date: "2020-01-01".to_string(),
        end_date: "2020-01-02".to_string(),
    }
}

fn ids(raw: &[&str]) -> Vec<EventId> {
    raw.iter().copied().map(EventId::from).collect()
}

fn standup() -> EventPayload {
    EventPayload::new("Standup", "2025-01-01", "2025-01-02")
}

#[tokio::test]
async fn create_command_yields_created_event() {
    let api = FakeEventsApi::default();
    let event = execute_command(
        &api,
        BackendCommand::CreateEvent {
            form_id: FormId(3),
            payload: standup(),
        },
    )
    .await;

    match event {
        UiEvent::EventCreated { form_id, event } => {
            assert_eq!(form_id, FormId(3));
            assert_eq!(event.event_name, "Standup");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn update_command_carries_edited_id() {
    let api = FakeEventsApi::default();
    let event = execute_command(
        &api,
        BackendCommand::UpdateEvent {
            form_id: FormId(1),
            id: EventId::from("5"),
            payload: standup(),
        },
    )
    .await;

    assert!(matches!(
        event,
        UiEvent::EventUpdated { id, .. } if id == EventId::from("5")
    ));
    assert_eq!(*api.calls.lock().await, vec!["update 5".to_string()]);
}

#[tokio::test]
async fn sweep_fetch_returns_current_server_list() {
    let api = FakeEventsApi::seeded(vec![expired("1")]);

    let event = execute_command(&api, BackendCommand::FetchSweepCandidates).await;
    assert!(matches!(event, UiEvent::SweepCandidates(events) if events.len() == 1));
}

#[tokio::test]
async fn expired_deletes_run_in_order() {
    let api = FakeEventsApi::seeded(vec![expired("1"), expired("2"), expired("3")]);

    let event = execute_command(
        &api,
        BackendCommand::DeleteExpired {
            ids: ids(&["1", "3"]),
        },
    )
    .await;

    match event {
        UiEvent::ExpiredDeleted { deleted, error } => {
            assert_eq!(deleted, ids(&["1", "3"]));
            assert!(error.is_none());
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        *api.calls.lock().await,
        vec!["delete 1".to_string(), "delete 3".to_string()]
    );
    assert_eq!(*api.events.lock().await, vec![expired("2")]);
}

#[tokio::test]
async fn expired_deletes_stop_at_first_failure() {
    let api = FakeEventsApi::failing_on(
        "delete 2",
        "{not json",
        vec![expired("1"), expired("2"), expired("3")],
    );

    let event = execute_command(
        &api,
        BackendCommand::DeleteExpired {
            ids: ids(&["1", "2", "3"]),
        },
    )
    .await;

    match event {
        UiEvent::ExpiredDeleted { deleted, error } => {
            assert_eq!(deleted, ids(&["1"]));
            let err = error.expect("sweep failure");
            assert_eq!(err.context(), UiErrorContext::SweepExpired);
            assert_eq!(err.category(), UiErrorCategory::Decode);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        *api.calls.lock().await,
        vec!["delete 1".to_string(), "delete 2".to_string()]
    );
    assert_eq!(*api.events.lock().await, vec![expired("2"), expired("3")]);
}

#[tokio::test]
async fn api_failure_maps_to_error_with_form_context() {
    let api = FakeEventsApi::failing("{not json");
    let event = execute_command(
        &api,
        BackendCommand::CreateEvent {
            form_id: FormId(8),
            payload: standup(),
        },
    )
    .await;

    match event {
        UiEvent::Error(err) => {
            assert_eq!(err.context(), UiErrorContext::CreateEvent(FormId(8)));
            assert_eq!(err.category(), UiErrorCategory::Decode);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn delete_failure_reports_delete_context() {
    let api = FakeEventsApi::failing("{not json");
    let event = execute_command(
        &api,
        BackendCommand::DeleteEvent {
            id: EventId::from("1"),
        },
    )
    .await;
    assert!(matches!(
        event,
        UiEvent::Error(err) if err.context() == UiErrorContext::DeleteEvent
    ));
}

#[tokio::test]
async fn backend_loop_runs_commands_in_queue_order() {
    let api = Arc::new(FakeEventsApi::default());
    let (cmd_tx, cmd_rx) = bounded(16);
    let (ui_tx, ui_rx) = bounded(16);

    cmd_tx
        .send(BackendCommand::CreateEvent {
            form_id: FormId(0),
            payload: standup(),
        })
        .expect("queue create");
    cmd_tx
        .send(BackendCommand::DeleteEvent {
            id: EventId::from("1"),
        })
        .expect("queue delete");
    cmd_tx.send(BackendCommand::LoadEvents).expect("queue load");
    drop(cmd_tx);

    run_backend_loop(api.clone(), cmd_rx, ui_tx).await;

    let events: Vec<_> = ui_rx.try_iter().collect();
    assert!(matches!(events[0], UiEvent::Info(_)));
    assert!(matches!(events[1], UiEvent::EventCreated { .. }));
    assert!(matches!(events[2], UiEvent::EventDeleted { .. }));
    assert!(matches!(&events[3], UiEvent::EventsLoaded(list) if list.is_empty()));
    assert_eq!(
        *api.calls.lock().await,
        vec![
            "create Standup".to_string(),
            "delete 1".to_string(),
            "list".to_string(),
        ]
    );
}
