//! # Observability
//!
//! - `logging`: tracing subscriber setup (json or text output)

pub mod logging;

pub use logging::{default_filter, init_logging, LogFormat};
