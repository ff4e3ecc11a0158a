//! # Shutdown
//!
//! Process shutdown signalling shared by the sync loop and the reload task.

use tokio::sync::watch;
use tracing::{info, warn};

/// Sending half, owned by whoever decides the process should stop
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

/// Receiving half, cloned into every long-running task
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

/// Create a connected trigger/signal pair
#[must_use]
pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, ShutdownSignal { receiver })
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // Receivers may all be gone already, which is fine
        let _ = self.sender.send(true);
    }
}

impl ShutdownSignal {
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&mut self) {
        if self.receiver.wait_for(|stop| *stop).await.is_err() {
            // Trigger dropped without firing: nothing will ever stop us
            std::future::pending::<()>().await;
        }
    }
}

/// Fire `trigger` on SIGINT or SIGTERM
pub fn listen_for_signals(trigger: ShutdownTrigger) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received shutdown signal, finishing the current cycle before exiting...");
        trigger.trigger();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler, only SIGINT will stop the daemon: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_observes_trigger() {
        let (trigger, mut signal) = channel();
        assert!(!signal.is_triggered());

        trigger.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .unwrap();
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (trigger, signal) = channel();
        let clone = signal.clone();
        trigger.trigger();
        assert!(signal.is_triggered());
        assert!(clone.is_triggered());
    }
}
