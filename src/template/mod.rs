//! # Templates
//!
//! Template rendering used by rule pre-steps and conditions.
//!
//! The reconciler only depends on the [`TemplateEvaluator`] trait. The default
//! implementation, [`HandlebarsEvaluator`], is backed by `handlebars` and
//! accepts Go-style dot paths (`{{ .object.metadata.name }}`).

mod compat;
mod engine;

pub use self::compat::rewrite_go_paths;
pub use self::engine::HandlebarsEvaluator;

use serde_json::{Map, Value};
use thiserror::Error;

/// Values visible to a template render
///
/// Keys used by the reconciler: `object` (resource under evaluation) and,
/// during the pre-step only, `targets` (all filtered candidates).
pub type TemplateContext = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("error rendering template '{template}': {message}")]
pub struct TemplateError {
    pub template: String,
    pub message: String,
}

impl TemplateError {
    pub fn new(template: &str, message: impl Into<String>) -> Self {
        Self {
            template: template.to_string(),
            message: message.into(),
        }
    }
}

/// Renders a template string against a context
///
/// Implementations may add keys to `context`; additions made while rendering
/// a pre-step stay visible to the condition renders of the same rule.
pub trait TemplateEvaluator: Send + Sync {
    fn render(&self, template: &str, context: &mut TemplateContext)
        -> Result<String, TemplateError>;
}
