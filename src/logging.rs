//! Tracing configuration and log routing.
//!
//! Logs go to stdout through a compact formatter and, when a writable target
//! exists, to a file as well. `PRECIS_LOG_FILE` overrides the default
//! `logs/precis.log` destination. File writes go through a non-blocking
//! writer whose guard is held for the process lifetime.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// Respects `RUST_LOG` for filtering and defaults to `info`. A missing or
/// unwritable log destination downgrades to stdout-only logging instead of
/// failing startup.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = file_writer().map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Build a non-blocking writer for file logging, if a destination is usable.
fn file_writer() -> Option<NonBlocking> {
    let (non_blocking, guard) = match std::env::var("PRECIS_LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| eprintln!("Failed to open log file {path}: {err}"))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => {
            std::fs::create_dir_all("logs")
                .map_err(|err| eprintln!("Failed to create logs directory: {err}"))
                .ok()?;
            tracing_appender::non_blocking(tracing_appender::rolling::never("logs", "precis.log"))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(non_blocking)
}
