//! File logging. The terminal belongs to the TUI, so nothing goes to stdout.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_state_dir};

/// Directory the daily log files go to.
pub fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings.directory.clone().unwrap_or_else(default_state_dir)
}

/// `RUST_LOG` wins over the configured filter; an unparsable filter falls back to `info`.
pub fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `<dir>/folio.log.<date>`.
///
/// Keep the returned guard alive for the whole run; dropping it flushes the writer.
pub fn init(settings: &LoggingSettings) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let dir = log_dir(settings);
    init_in(&dir, filter(settings))
}

fn init_in(dir: &Path, filter: EnvFilter) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, "folio.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
