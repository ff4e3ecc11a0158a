//! # hitman
//!
//! Kubernetes daemon that periodically lists target resources and deletes the
//! ones whose templated conditions all hold.

use anyhow::Result;
use clap::Parser;
use hitman::cli::{schema_json, validate_command, version_string, Cli, Commands};
use hitman::config::ControllerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => hitman::runtime::run(ControllerConfig::from(args)).await,
        Commands::Validate { config } => validate_command(config).await,
        Commands::Schema => {
            println!("{}", schema_json()?);
            Ok(())
        }
        Commands::Version => {
            println!("{}", version_string());
            Ok(())
        }
    }
}
