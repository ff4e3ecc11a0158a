//! # Command Line
//!
//! `hitman` subcommands and their flags.
//!
//! ```bash
//! # Run the daemon
//! hitman run --config /etc/hitman/config.yaml
//!
//! # Check a policy document without touching the cluster
//! hitman validate --config ./hitman.yaml
//!
//! # Print the JSON Schema of the policy document
//! hitman schema > hitman.schema.json
//! ```

use crate::api::Configuration;
use crate::config::{rule_issues, ConfigLoader, ControllerConfig};
use crate::constants::{DEFAULT_CONFIG_PATH, DEFAULT_RELOAD_INTERVAL};
use crate::controller::validation::parse_positive_duration;
use crate::observability::LogFormat;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Kubernetes daemon that deletes resources matching user-defined conditions
#[derive(Debug, Parser)]
#[command(name = "hitman", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the reconciliation daemon
    Run(RunArgs),
    /// Load a policy document and report which rules would be skipped
    Validate {
        /// Path to the YAML policy document
        #[arg(long, env = "HITMAN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// Print the JSON Schema of the policy document
    Schema,
    /// Print version and build information
    Version,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the YAML policy document
    #[arg(long, env = "HITMAN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log matching resources instead of deleting them
    #[arg(long, env = "HITMAN_DRY_RUN")]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Hide target, file and line decoration in log lines
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub disable_trace: bool,

    /// Period between two reads of the policy document, e.g. `2s`
    #[arg(
        long,
        env = "HITMAN_RELOAD_INTERVAL",
        default_value = DEFAULT_RELOAD_INTERVAL,
        value_parser = parse_reload_interval
    )]
    pub reload_interval: Duration,
}

fn parse_reload_interval(value: &str) -> Result<Duration, String> {
    parse_positive_duration(value).map_err(|e| e.to_string())
}

impl From<RunArgs> for ControllerConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            config_path: args.config,
            dry_run: args.dry_run,
            reload_interval: args.reload_interval,
            log_level: args.log_level,
            log_format: args.log_format,
            disable_trace: args.disable_trace,
        }
    }
}

/// Load the document at `path` and print one line per rule
///
/// Fails only when the document itself cannot be loaded; skipped rules are
/// reported but do not fail validation.
pub async fn validate_command(path: PathBuf) -> Result<()> {
    let loader = ConfigLoader::from_path(&path);
    let config = loader
        .load()
        .await
        .with_context(|| format!("Policy '{}' is invalid", path.display()))?;

    println!(
        "Policy '{}' loaded: interval {}, processing delay {}, {} rule(s)",
        config.display_name(),
        config.spec.synchronization.time,
        config.spec.synchronization.processing_delay,
        config.spec.resources.len()
    );

    let issues = rule_issues(&config);
    for (index, rule) in config.spec.resources.iter().enumerate() {
        let gvr = rule.target.gvr();
        match issues.iter().find(|(i, _)| *i == index) {
            Some((_, issue)) => println!("  ✗ rule #{index} {gvr}: will be skipped: {issue}"),
            None => println!(
                "  ✓ rule #{index} {gvr}: {} condition(s){}",
                rule.conditions.len(),
                if rule.pre_step.trim().is_empty() {
                    ""
                } else {
                    ", pre-step"
                }
            ),
        }
    }
    Ok(())
}

/// JSON Schema of the policy document
pub fn schema_json() -> Result<String> {
    let schema = schemars::schema_for!(Configuration);
    serde_json::to_string_pretty(&schema).context("Failed to serialize schema")
}

/// Version line with build metadata
#[must_use]
pub fn version_string() -> String {
    format!(
        "hitman {} (git {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env!("BUILD_DATETIME")
    )
}
