//! Logging infrastructure for statemiles.
//!
//! Structured logging via `tracing`:
//! - Compact console output on stdout for CLI use
//! - Optional file output (`statemiles.log`) when a log directory is given
//! - Configurable via the `RUST_LOG` environment variable (defaults to INFO)

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file name used when file logging is enabled.
pub const LOG_FILE: &str = "statemiles.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping the guard flushes and closes the file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system.
///
/// When `log_dir` is given the directory is created if needed and log lines
/// are written to `statemiles.log` inside it (without ANSI colors) in
/// addition to stdout.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or if a global
/// subscriber was already installed.
pub fn init(log_dir: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let file_guard = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            registry
                .with(file_layer)
                .try_init()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            Some(guard)
        }
        None => {
            registry
                .try_init()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            None
        }
    };

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
