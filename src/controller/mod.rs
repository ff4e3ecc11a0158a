//! # Controller
//!
//! - `reconciler`: per-cycle rule processing
//! - `validation`: duration parsing and rule selector checks

pub mod reconciler;
pub mod validation;
