//! CLI logging
//!
//! Diagnostics go through `tracing`. This module installs the subscriber:
//! - Verbosity from flags or `SODSCAN_VERBOSE` / `SODSCAN_DEBUG` / `SODSCAN_TRACE`
//! - `RUST_LOG` overrides the computed filter when set
//! - Optional plain-text copy of every line in a log file
//!
//! Results are printed to stdout; logs always go to stderr.

pub mod config;
pub mod level;

pub use config::LogConfig;
pub use level::LogLevel;

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{CliError, CliResult};

/// Install the global tracing subscriber.
///
/// Fails if the log file cannot be opened, the filter is invalid, or a
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directive()))
        .map_err(|e| CliError::Config(format!("Invalid log filter: {}", e)))?;

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    CliError::Io(format!("Failed to open log file {}: {}", path.display(), e))
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_ansi(config.color)
        .with_target(config.is_debug())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(level = %config.level, quiet = config.quiet, "Logging initialized");
    Ok(())
}
