use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use events_client::DEFAULT_EVENTS_URL;
use serde::Deserialize;
use url::Url;

const LOCAL_CONFIG_FILE: &str = "event_manager.toml";

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "event_manager", about = "Desktop manager for a REST events resource")]
pub struct Args {
    /// TOML settings file; defaults to the per-user config dir, then ./event_manager.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Base URL of the events resource, e.g. http://localhost:3000/events
    #[arg(long)]
    pub api_url: Option<String>,
    /// tracing filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EVENTS_URL.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    log_filter: Option<String>,
}

pub fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    load_settings_with(args, default_config_paths(), |name| std::env::var(name).ok())
}

/// Layers defaults, the first config file found, environment, then CLI flags.
fn load_settings_with(
    args: &Args,
    fallback_paths: Vec<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match &args.config {
        Some(path) => Some(read_file_settings(path)?),
        None => fallback_paths
            .iter()
            .find(|path| path.is_file())
            .map(|path| read_file_settings(path))
            .transpose()?,
    };
    if let Some(file_cfg) = file_cfg {
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());
    if let Some(v) = non_empty("EVENTS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = non_empty("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = non_empty("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = &args.api_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &args.log_filter {
        settings.log_filter = v.clone();
    }

    settings.api_url = validate_api_url(&settings.api_url)?;
    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("event_manager").join("config.toml"));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
    paths
}

fn validate_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).with_context(|| format!("invalid events API url '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "events API url '{trimmed}' must use http or https, not '{}'",
            url.scheme()
        );
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
