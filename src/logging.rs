use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Route `tracing` events to the configured log file. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr. Nothing is installed
/// when this fails; see [`init_discarding`].
pub fn init(config: &Config) -> Result<()> {
    let log_file = config
        .log_file
        .as_deref()
        .ok_or_else(|| anyhow!("no log file location (home directory not found)"))?;

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

/// Install a subscriber that drops every event, used when the log file is not
/// available so the catalog still runs.
pub fn init_discarding() {
    let _ = tracing_subscriber::fmt().with_writer(io::sink).try_init();
}
