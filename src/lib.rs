//! hitman library
//!
//! Polling reconciliation engine that deletes Kubernetes resources matching
//! policy rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use hitman::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific
//! imports, use the individual modules.

pub mod api;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod controller;
pub mod observability;
pub mod prelude;
pub mod runtime;
pub mod template;
