//! # Logging
//!
//! `tracing-subscriber` setup for the daemon.

use crate::config::ControllerConfig;
use crate::constants::LOG_TARGET;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Output format of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable lines
    Text,
}

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub fn default_filter(log_level: &str) -> String {
    format!("{LOG_TARGET}={}", log_level.trim().to_lowercase())
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &ControllerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.log_level)));
    let decorate = !config.disable_trace;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(decorate)
        .with_file(decorate)
        .with_line_number(decorate);

    let result = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
