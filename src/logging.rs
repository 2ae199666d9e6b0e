//! Logging setup
//!
//! Logs go to stderr through a `tracing_subscriber` fmt layer. `RUST_LOG`
//! takes precedence over the configured level.

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Error types for logging
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
}

/// Build the filter: `RUST_LOG` if set, otherwise `level`
///
/// # Errors
///
/// Returns `LoggingError::Filter` if `level` is not a valid filter directive.
pub fn filter_for(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::Filter {
            filter: level.to_string(),
            reason: e.to_string(),
        })
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed; the existing one is
/// kept.
///
/// # Errors
///
/// Returns `LoggingError::Filter` if `level` is not a valid filter directive.
pub fn init(level: &str) -> Result<bool, LoggingError> {
    let filter = filter_for(level)?;
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok();

    if installed {
        debug!(level, "logger initialized");
    }
    Ok(installed)
}
