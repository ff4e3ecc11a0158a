//! # Sync Loop
//!
//! Runs reconciliation cycles back to back, sleeping the active policy's
//! interval between them. Cycles never overlap.

use crate::api::Configuration;
use crate::config::PolicyStore;
use crate::controller::reconciler::{Reconciler, SyncReport};
use crate::runtime::shutdown::ShutdownSignal;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Run one cycle against the store's current snapshot
///
/// The snapshot is taken once; the returned `Arc` is the exact document the
/// cycle used.
pub async fn run_cycle(
    reconciler: &Reconciler,
    store: &PolicyStore,
) -> (Arc<Configuration>, SyncReport) {
    let snapshot = store.snapshot().await;
    let report = reconciler.sync_resources(&snapshot).await;
    log_summary(&snapshot, &report);
    (snapshot, report)
}

fn log_summary(config: &Configuration, report: &SyncReport) {
    info!(
        policy = %config.display_name(),
        rules = report.rules.len(),
        rules_skipped = report.rules_skipped(),
        candidates = report.candidates(),
        deleted = report.deleted(),
        dry_run = report.dry_run(),
        conditions_not_met = report.conditions_not_met(),
        failed = report.failed(),
        "Reconciliation cycle finished"
    );
}

/// RFC 3339 time of the next cycle, for log lines
#[must_use]
pub fn next_cycle_at(interval: Duration) -> String {
    chrono::Duration::from_std(interval)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .map(|at| at.to_rfc3339())
        .unwrap_or_default()
}

/// Loop until `shutdown` fires
///
/// A shutdown requested mid-cycle takes effect once the cycle completes; one
/// requested while sleeping takes effect immediately.
pub async fn run_sync_loop(
    reconciler: &Reconciler,
    store: &PolicyStore,
    mut shutdown: ShutdownSignal,
) {
    info!("Starting sync loop...");

    while !shutdown.is_triggered() {
        let (snapshot, _report) = run_cycle(reconciler, store).await;

        let interval = snapshot.sync_interval();
        info!(
            "Syncer will run again at {} (in {:?})",
            next_cycle_at(interval),
            interval
        );

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = shutdown.wait() => {}
        }
    }

    info!("Sync loop stopped");
}
