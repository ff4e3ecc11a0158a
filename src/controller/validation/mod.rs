//! # Validation
//!
//! Validation of the policy document: duration strings and rule selectors.

pub mod duration;
pub mod rule;

pub use duration::{parse_duration, parse_positive_duration, DurationError};
pub use rule::{compile_rule, validate_rule, RuleMatchers};
