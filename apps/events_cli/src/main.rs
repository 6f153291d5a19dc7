use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use events_client::{EventsApi, HttpEventsApi, DEFAULT_EVENTS_URL};
use shared::{
    domain::{Event, EventId},
    protocol::EventPayload,
};

#[derive(Parser, Debug)]
#[command(name = "events_cli", about = "Command-line access to a REST events resource")]
struct Cli {
    #[arg(long, env = "EVENTS_API_URL", default_value = DEFAULT_EVENTS_URL)]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every event
    List,
    Create {
        name: String,
        start: String,
        end: String,
    },
    Update {
        id: String,
        name: String,
        start: String,
        end: String,
    },
    Delete {
        id: String,
    },
    /// Delete every event whose end date is before today
    Sweep {
        #[arg(long, value_parser = parse_day)]
        today: Option<NaiveDate>,
    },
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn format_event(event: &Event) -> String {
    format!(
        "{}\t{}\t{} -> {}",
        event.id, event.event_name, event.start_date, event.end_date
    )
}

fn payload(name: String, start: String, end: String) -> Result<EventPayload> {
    let payload = EventPayload::new(name, start, end);
    if !payload.is_complete() {
        anyhow::bail!("event name, start date, and end date must all be non-empty");
    }
    Ok(payload)
}

async fn sweep(api: &dyn EventsApi, today: NaiveDate) -> Result<Vec<EventId>> {
    let events = api.list().await.context("failed to list events")?;
    let mut deleted = Vec::new();
    for event in events.iter().filter(|event| event.is_expired_on(today)) {
        api.delete(&event.id).await.with_context(|| {
            format!(
                "failed to delete expired event {} after removing {}",
                event.id,
                deleted.len()
            )
        })?;
        tracing::info!(id = %event.id, end_date = %event.end_date, "deleted expired event");
        deleted.push(event.id.clone());
    }
    Ok(deleted)
}

async fn delete_event(api: &dyn EventsApi, id: &EventId) -> Result<()> {
    match api.delete(id).await {
        Ok(_) => Ok(()),
        Err(err) if err.status().is_some_and(|status| status.as_u16() == 404) => {
            anyhow::bail!("no event with id {id}")
        }
        Err(err) => Err(err).context("failed to delete event"),
    }
}

/// Runs one subcommand and returns the lines to print.
async fn run(api: &dyn EventsApi, command: Command, today: NaiveDate) -> Result<Vec<String>> {
    let lines = match command {
        Command::List => api
            .list()
            .await
            .context("failed to list events")?
            .iter()
            .map(format_event)
            .collect(),
        Command::Create { name, start, end } => {
            let event = api
                .create(&payload(name, start, end)?)
                .await
                .context("failed to create event")?;
            vec![format!("created {}", format_event(&event))]
        }
        Command::Update {
            id,
            name,
            start,
            end,
        } => {
            let event = api
                .update(&EventId::from(id), &payload(name, start, end)?)
                .await
                .context("failed to update event")?;
            vec![format!("updated {}", format_event(&event))]
        }
        Command::Delete { id } => {
            let id = EventId::from(id);
            delete_event(api, &id).await?;
            vec![format!("deleted {id}")]
        }
        Command::Sweep { today: day } => {
            let deleted = sweep(api, day.unwrap_or(today)).await?;
            vec![format!("removed {} expired events", deleted.len())]
        }
    };
    Ok(lines)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let api = HttpEventsApi::new(cli.api_url).context("invalid --api-url")?;

    for line in run(&api, cli.command, Local::now().date_naive()).await? {
        println!("{line}");
    }
    Ok(())
}
