//! # Constants
//!
//! Shared constants used throughout the daemon.
//!
//! These values represent reasonable defaults and can be overridden via
//! the policy document or command-line flags where applicable.

/// Default synchronization interval when `spec.synchronization.time` is absent or empty
pub const DEFAULT_SYNC_TIME: &str = "1m";

/// Default pause between consecutive rules when `spec.synchronization.processingDelay` is absent or empty
pub const DEFAULT_SYNC_PROCESSING_DELAY: &str = "1s";

/// Default period of the policy reload task
pub const DEFAULT_RELOAD_INTERVAL: &str = "2s";

/// Default policy document location
pub const DEFAULT_CONFIG_PATH: &str = "hitman.yaml";

/// Page size used when listing target resources
pub const LIST_PAGE_SIZE: u32 = 500;

/// Context key bound to the resource under evaluation
pub const CONTEXT_KEY_OBJECT: &str = "object";

/// Context key bound to the filtered candidate set during the pre-step
pub const CONTEXT_KEY_TARGETS: &str = "targets";

/// Default tracing filter target
pub const LOG_TARGET: &str = "hitman";
