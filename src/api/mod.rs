//! # Policy API
//!
//! Types of the policy document (`hitman.freepik.com/v1alpha1`, kind `Config`).
//!
//! ## Module Structure
//!
//! - `spec.rs` - Document, rules, targets and conditions
//! - `selector.rs` - Name/namespace selectors and their compiled matchers

mod selector;
mod spec;

pub use selector::{Matcher, Selector, SelectorDimension, SelectorError};
pub use spec::{
    Condition, Configuration, ConfigurationSpec, GroupVersionResource, Metadata, ResourceRule,
    Synchronization, Target,
};
