//! # Policy Reload
//!
//! Periodically re-reads the policy document and installs it into the store.
//!
//! A reload that fails to read or parse keeps the previous document active.

use crate::config::{ConfigLoader, InstallOutcome, PolicyStore};
use crate::runtime::shutdown::ShutdownSignal;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Outcome of one reload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A changed document was installed under this generation
    Installed(u64),
    /// The document on disk matches the active one
    Unchanged,
    /// The document could not be loaded; the previous one stays active
    Failed,
}

/// Load the document once and install it when it changed
pub async fn reload_policy(loader: &ConfigLoader, store: &PolicyStore) -> ReloadOutcome {
    let config = match loader.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(
                path = %loader.path().display(),
                "Failed to reload policy, keeping the previous one: {}",
                e
            );
            return ReloadOutcome::Failed;
        }
    };

    let name = config.display_name().to_string();
    match store.install(config).await {
        InstallOutcome::Installed(generation) => {
            info!(
                policy = %name,
                generation,
                "✅ Policy reloaded from '{}'",
                loader.path().display()
            );
            ReloadOutcome::Installed(generation)
        }
        InstallOutcome::Unchanged(_) => {
            debug!("policy.reload.unchanged");
            ReloadOutcome::Unchanged
        }
    }
}

/// Spawn the background reload task
///
/// The task reloads every `interval` until `shutdown` fires. The first tick
/// is skipped because the caller has just loaded the document.
pub fn start_policy_reload(
    loader: ConfigLoader,
    store: PolicyStore,
    interval: Duration,
    mut shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        info!(
            "Watching '{}' for policy changes every {:?}",
            loader.path().display(),
            interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    reload_policy(&loader, &store).await;
                }
                () = shutdown.wait() => {
                    debug!("policy.reload.stopped");
                    break;
                }
            }
        }
    })
}
