//! # Runtime
//!
//! Daemon lifecycle.
//!
//! - `initialization`: startup (logging, first policy load, Kubernetes client, reload task)
//! - `sync_loop`: periodic reconciliation cycles
//! - `shutdown`: SIGINT/SIGTERM handling

pub mod initialization;
pub mod shutdown;
pub mod sync_loop;

pub use initialization::{initialize, InitializationResult};
pub use sync_loop::{next_cycle_at, run_cycle, run_sync_loop};

use crate::config::ControllerConfig;
use anyhow::Result;
use tracing::{info, warn};

/// Run the daemon until SIGINT or SIGTERM
pub async fn run(config: ControllerConfig) -> Result<()> {
    let runtime = initialize(&config).await?;

    run_sync_loop(&runtime.reconciler, &runtime.store, runtime.shutdown.clone()).await;

    if let Err(e) = runtime.reload_handle.await {
        warn!("Policy reload task ended abnormally: {}", e);
    }
    info!("hitman stopped");
    Ok(())
}
