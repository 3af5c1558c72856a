//! `tracing` subscriber setup for the binary.

use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "RELAY_LOG";

/// Filter used when `RELAY_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,homework_relay=debug";

/// Install the global subscriber: stdout plus, when given, an appended log file.
///
/// Calling it twice is harmless; the second call leaves the first subscriber
/// in place.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?)),
        ),
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
