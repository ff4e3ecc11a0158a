//! # Policy Store
//!
//! Holds the active policy document.
//!
//! Readers take an `Arc` snapshot under a short read lock and keep it for the
//! whole reconciliation cycle; installs swap the `Arc` under the write lock.
//! A reload landing mid-cycle therefore never changes the rules an in-flight
//! cycle sees.

use crate::api::Configuration;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Result of [`PolicyStore::install`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The document replaced the active one; carries the new generation
    Installed(u64),
    /// The document is identical to the active one
    Unchanged(u64),
}

#[derive(Debug)]
struct ActivePolicy {
    config: Arc<Configuration>,
    generation: u64,
}

/// Shared, hot-reloadable policy document
#[derive(Debug, Clone)]
pub struct PolicyStore {
    inner: Arc<RwLock<ActivePolicy>>,
}

impl PolicyStore {
    /// Create a store with its first active document (generation 1)
    #[must_use]
    pub fn new(initial: Configuration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ActivePolicy {
                config: Arc::new(initial),
                generation: 1,
            })),
        }
    }

    /// Consistent view of the active document
    pub async fn snapshot(&self) -> Arc<Configuration> {
        Arc::clone(&self.inner.read().await.config)
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Replace the active document
    ///
    /// Documents equal to the active one are ignored so periodic reloads of an
    /// unchanged file do not bump the generation.
    pub async fn install(&self, config: Configuration) -> InstallOutcome {
        let mut active = self.inner.write().await;
        if *active.config == config {
            return InstallOutcome::Unchanged(active.generation);
        }
        active.config = Arc::new(config);
        active.generation += 1;
        InstallOutcome::Installed(active.generation)
    }
}
