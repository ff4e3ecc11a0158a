//! # Policy Loader
//!
//! Reads the policy document from disk, fills in defaults and parses the
//! synchronization durations.
//!
//! The loader only reports errors. Whether a failure is fatal (first load) or
//! tolerated (periodic reload) is decided by the caller.

use crate::api::{Configuration, SelectorError};
use crate::config::ControllerConfig;
use crate::constants::{DEFAULT_SYNC_PROCESSING_DELAY, DEFAULT_SYNC_TIME};
use crate::controller::validation::{compile_rule, parse_positive_duration, DurationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("impossible to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("impossible to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unable to parse duration 'spec.synchronization.{field}': {source}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: DurationError,
    },
}

/// Parse a policy document and normalise it
pub fn parse_configuration(content: &str) -> Result<Configuration, ConfigLoadError> {
    let mut config = if content.trim().is_empty() {
        Configuration::default()
    } else {
        serde_yaml::from_str::<Configuration>(content)?
    };
    normalize(&mut config)?;
    Ok(config)
}

/// Default the synchronization durations and parse them
///
/// Absent or empty values take the built-in defaults; anything else must
/// parse as a strictly positive duration. `interval` is read only when `time`
/// is empty.
pub fn normalize(config: &mut Configuration) -> Result<(), ConfigLoadError> {
    let sync = &mut config.spec.synchronization;

    if sync.time.trim().is_empty() {
        sync.time = if sync.interval.trim().is_empty() {
            DEFAULT_SYNC_TIME.to_string()
        } else {
            sync.interval.clone()
        };
    }
    sync.time_duration =
        parse_positive_duration(&sync.time).map_err(|source| ConfigLoadError::InvalidDuration {
            field: "time",
            source,
        })?;

    if sync.processing_delay.trim().is_empty() {
        sync.processing_delay = DEFAULT_SYNC_PROCESSING_DELAY.to_string();
    }
    sync.processing_delay_duration = parse_positive_duration(&sync.processing_delay).map_err(
        |source| ConfigLoadError::InvalidDuration {
            field: "processingDelay",
            source,
        },
    )?;

    Ok(())
}

/// Rules that will be skipped at cycle time, with the reason
///
/// These never fail a load; they are reported so operators notice them
/// before the first cycle does.
#[must_use]
pub fn rule_issues(config: &Configuration) -> Vec<(usize, SelectorError)> {
    config
        .spec
        .resources
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| compile_rule(rule).err().map(|e| (index, e)))
        .collect()
}

/// Loads the policy document from its configured location
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    #[must_use]
    pub fn new(config: &ControllerConfig) -> Self {
        Self::from_path(&config.config_path)
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and normalise the document
    pub async fn load(&self) -> Result<Configuration, ConfigLoadError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ConfigLoadError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        let config = parse_configuration(&content)?;
        debug!(
            path = %self.path.display(),
            rules = config.spec.resources.len(),
            "policy.loaded"
        );

        for (index, issue) in rule_issues(&config) {
            let target = &config.spec.resources[index].target;
            warn!(
                rule = index,
                gvr = %target.gvr(),
                "rule will be skipped: {}",
                issue
            );
        }

        Ok(config)
    }
}
