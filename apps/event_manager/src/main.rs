use std::sync::Arc;

mod backend_bridge;
mod config;
mod controller;
mod model;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use events_client::{EventsApi, HttpEventsApi};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::EventManagerApp;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();
    let settings = config::load_settings(&args)?;
    init_tracing(&settings.log_filter);
    tracing::info!(api_url = %settings.api_url, "starting event manager");

    let api: Arc<dyn EventsApi> = Arc::new(HttpEventsApi::new(settings.api_url.clone())?);
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(api, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Event Manager")
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([520.0, 320.0]),
        ..Default::default()
    };
    let api_url = settings.api_url;
    eframe::run_native(
        "Event Manager",
        options,
        Box::new(move |_cc| Ok(Box::new(EventManagerApp::new(cmd_tx, ui_rx, api_url)))),
    )
    .map_err(|err| anyhow!("event manager window failed: {err}"))
}
