//! # Configuration
//!
//! - `controller`: process-level settings resolved from flags and environment
//! - `loader`: reads and normalises the policy document
//! - `store`: the active policy document, shared between the reload task and the sync loop
//! - `watch`: periodic policy reload

pub mod controller;
pub mod loader;
pub mod store;
pub mod watch;

pub use controller::ControllerConfig;
pub use loader::{normalize, parse_configuration, rule_issues, ConfigLoadError, ConfigLoader};
pub use store::{InstallOutcome, PolicyStore};
pub use watch::{reload_policy, start_policy_reload, ReloadOutcome};
