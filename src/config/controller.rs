//! # Controller Configuration
//!
//! Process-level settings, resolved once at startup from command-line flags
//! (with environment variable fallbacks) and passed to every component.

use crate::constants::{DEFAULT_CONFIG_PATH, DEFAULT_RELOAD_INTERVAL};
use crate::controller::validation::parse_positive_duration;
use crate::observability::LogFormat;
use std::path::PathBuf;
use std::time::Duration;

/// Controller-level configuration
///
/// There is no process-wide state: this value is built by `main` and handed
/// by reference to the loader, the reconciler and the runtime.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Path to the YAML policy document
    pub config_path: PathBuf,
    /// Compute and log eligibility without deleting anything
    pub dry_run: bool,
    /// Period of the policy reload task
    pub reload_interval: Duration,
    /// Global log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: LogFormat,
    /// Hide file, line and target decoration in log lines
    pub disable_trace: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            dry_run: false,
            reload_interval: parse_positive_duration(DEFAULT_RELOAD_INTERVAL)
                .unwrap_or(Duration::from_secs(2)),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            disable_trace: true,
        }
    }
}
