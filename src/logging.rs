//! Tracing configuration and log routing.
//!
//! The worker logs to stdout with a compact formatter and, when a log file can be opened,
//! mirrors events to it through a non-blocking writer so slow disks never stall ingestion.
//! `SHELFSCAN_LOG_FILE` overrides the default `logs/shelfscan.log` target; `RUST_LOG`
//! controls filtering and defaults to `info`.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Keeps the non-blocking writer alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact());

    match file_writer() {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        None => registry.init(),
    }
}

/// Open the log file and wrap it in a non-blocking writer.
///
/// Returns `None` when neither the override path nor the default logs directory is usable;
/// the worker then runs with stdout logging only.
fn file_writer() -> Option<NonBlocking> {
    let result = match std::env::var("SHELFSCAN_LOG_FILE") {
        Ok(path) => std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map(|file| tracing_appender::non_blocking(file))
            .map_err(|err| format!("Failed to open log file {path}: {err}")),
        Err(_) => std::fs::create_dir_all("logs")
            .map(|()| tracing_appender::non_blocking(tracing_appender::rolling::never("logs", "shelfscan.log")))
            .map_err(|err| format!("Failed to create logs directory: {err}")),
    };

    match result {
        Ok((non_blocking, guard)) => {
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(message) => {
            eprintln!("{message}");
            None
        }
    }
}
