//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use hitman::prelude::*;
//! ```

// Policy document
pub use crate::api::{
    Condition, Configuration, GroupVersionResource, ResourceRule, Selector, SelectorError, Target,
};

// Collaborator traits and their default implementations
pub use crate::cluster::{KubeResourceClient, ResourceClient, ResourceDocument};
pub use crate::template::{HandlebarsEvaluator, TemplateContext, TemplateError, TemplateEvaluator};

// Reconciliation
pub use crate::controller::reconciler::{
    Reconciler, ReconcilerError, ResourceOutcome, RuleOutcome, SyncReport,
};

// Configuration
pub use crate::config::{ConfigLoadError, ConfigLoader, ControllerConfig, PolicyStore};
