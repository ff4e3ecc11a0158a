//! # Handlebars Evaluator
//!
//! Default [`TemplateEvaluator`] backed by the `handlebars` crate.

use super::compat::rewrite_go_paths;
use super::{TemplateContext, TemplateError, TemplateEvaluator};
use chrono::DateTime;
use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output,
    RenderContext, RenderErrorReason,
};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, PoisonError};

handlebars_helper!(now: |*_args| chrono::Utc::now().timestamp());
handlebars_helper!(unix_epoch: |timestamp: str| {
    DateTime::parse_from_rfc3339(timestamp).ok().map(|parsed| parsed.timestamp())
});
handlebars_helper!(add: |a: i64, b: i64| a.saturating_add(b));
handlebars_helper!(sub: |a: i64, b: i64| a.saturating_sub(b));
handlebars_helper!(to_json: |value: Json| serde_json::to_string(value).unwrap_or_default());

/// `{{ set "key" value }}` stores a value for later renders of the same rule
///
/// Values are collected while rendering and merged into the caller's context
/// once the render succeeds.
struct SetHelper {
    assignments: Arc<Mutex<Map<String, Value>>>,
}

impl HelperDef for SetHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        _: &mut dyn Output,
    ) -> HelperResult {
        let key = h
            .param(0)
            .and_then(|param| param.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("set", 0))?;
        let value = h
            .param(1)
            .map(|param| param.value().clone())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("set", 1))?;

        self.assignments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Template evaluator backed by handlebars
///
/// - HTML escaping is disabled: rendered values are compared verbatim
/// - Missing paths render as an empty string
/// - Go-style `.path` expressions are accepted
///
/// Renders are serialised so `set` assignments of concurrent renders never mix.
pub struct HandlebarsEvaluator {
    registry: Handlebars<'static>,
    assignments: Arc<Mutex<Map<String, Value>>>,
    render_lock: Mutex<()>,
}

impl std::fmt::Debug for HandlebarsEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsEvaluator").finish_non_exhaustive()
    }
}

impl Default for HandlebarsEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlebarsEvaluator {
    #[must_use]
    pub fn new() -> Self {
        let assignments = Arc::new(Mutex::new(Map::new()));

        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(no_escape);

        registry.register_helper("now", Box::new(now));
        registry.register_helper("unixEpoch", Box::new(unix_epoch));
        registry.register_helper("add", Box::new(add));
        registry.register_helper("sub", Box::new(sub));
        registry.register_helper("toJson", Box::new(to_json));
        registry.register_helper(
            "set",
            Box::new(SetHelper {
                assignments: Arc::clone(&assignments),
            }),
        );

        Self {
            registry,
            assignments,
            render_lock: Mutex::new(()),
        }
    }
}

impl TemplateEvaluator for HandlebarsEvaluator {
    fn render(
        &self,
        template: &str,
        context: &mut TemplateContext,
    ) -> Result<String, TemplateError> {
        let _guard = self
            .render_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let source = rewrite_go_paths(template);
        let rendered = self.registry.render_template(&source, &*context);

        let assigned = std::mem::take(
            &mut *self
                .assignments
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let output = rendered.map_err(|e| TemplateError::new(template, e.to_string()))?;
        context.extend(assigned);
        Ok(output)
    }
}
