//! # Initialization
//!
//! Daemon startup: rustls provider, logging, first policy load, Kubernetes
//! client, reload task and signal handling.

use crate::cluster::KubeResourceClient;
use crate::config::{start_policy_reload, ConfigLoader, ControllerConfig, PolicyStore};
use crate::controller::reconciler::Reconciler;
use crate::observability::init_logging;
use crate::runtime::shutdown::{self, ShutdownSignal};
use crate::template::HandlebarsEvaluator;
use anyhow::{Context, Result};
use kube::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Everything the sync loop needs
pub struct InitializationResult {
    pub reconciler: Reconciler,
    /// Active policy, kept current by the reload task
    pub store: PolicyStore,
    pub shutdown: ShutdownSignal,
    pub reload_handle: JoinHandle<()>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

/// Start the daemon's collaborators
///
/// A policy that cannot be loaded here aborts startup; later reload failures
/// only keep the previous policy.
pub async fn initialize(config: &ControllerConfig) -> Result<InitializationResult> {
    // Must happen before any TLS connection is attempted
    let provider_installed = rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok();

    init_logging(config)?;
    if !provider_installed {
        debug!("rustls crypto provider was already installed");
    }

    info!("Starting hitman v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    if config.dry_run {
        info!("Dry-run enabled: matching resources will be logged, not deleted");
    }

    let loader = ConfigLoader::new(config);
    let policy = loader
        .load()
        .await
        .with_context(|| format!("Failed to load policy from '{}'", loader.path().display()))?;
    info!(
        policy = %policy.display_name(),
        rules = policy.spec.resources.len(),
        interval = %policy.spec.synchronization.time,
        "Policy loaded"
    );
    let store = PolicyStore::new(policy);

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig or in-cluster config is available.")?;
    let reconciler = Reconciler::new(
        Arc::new(KubeResourceClient::new(client)),
        Arc::new(HandlebarsEvaluator::new()),
        config,
    );

    let (trigger, signal) = shutdown::channel();
    shutdown::listen_for_signals(trigger);

    let reload_handle =
        start_policy_reload(loader, store.clone(), config.reload_interval, signal.clone());

    Ok(InitializationResult {
        reconciler,
        store,
        shutdown: signal,
        reload_handle,
    })
}
