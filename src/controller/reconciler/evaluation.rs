//! # Template Evaluation
//!
//! Pre-step and condition rendering for one rule.
//!
//! A rule owns a single [`TemplateContext`] for its whole run. The pre-step
//! sees `targets`; every condition render sees `object` plus whatever the
//! pre-step stored.

use crate::api::Condition;
use crate::cluster::ResourceDocument;
use crate::constants::{CONTEXT_KEY_OBJECT, CONTEXT_KEY_TARGETS};
use crate::controller::reconciler::types::ReconcilerError;
use crate::template::{TemplateContext, TemplateEvaluator};
use serde_json::Value;
use tracing::debug;

/// Result of evaluating a rule's conditions against one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionVerdict {
    /// Every condition held (or there were none)
    Met,
    /// First condition that did not hold, with what its key rendered to
    NotMet { index: usize, rendered: String },
}

/// Render the rule's pre-step with `targets` bound to the filtered candidates
///
/// The rendered text is discarded. `targets` is removed from the context
/// afterwards, whether or not the render succeeded.
pub fn run_pre_step(
    evaluator: &dyn TemplateEvaluator,
    pre_step: &str,
    candidates: &[ResourceDocument],
    context: &mut TemplateContext,
) -> Result<(), ReconcilerError> {
    if pre_step.trim().is_empty() {
        return Ok(());
    }

    let targets = candidates.iter().map(|c| c.raw().clone()).collect();
    context.insert(CONTEXT_KEY_TARGETS.to_string(), Value::Array(targets));
    let result = evaluator.render(pre_step, context);
    context.remove(CONTEXT_KEY_TARGETS);

    result.map(|_| ()).map_err(ReconcilerError::PreStep)
}

/// Bind `object` to `resource` and evaluate every condition in order
///
/// Stops at the first condition that does not hold. A render failure fails
/// the whole evaluation for this resource.
pub fn evaluate_conditions(
    evaluator: &dyn TemplateEvaluator,
    conditions: &[Condition],
    resource: &ResourceDocument,
    context: &mut TemplateContext,
) -> Result<ConditionVerdict, ReconcilerError> {
    context.insert(CONTEXT_KEY_OBJECT.to_string(), resource.raw().clone());

    for (index, condition) in conditions.iter().enumerate() {
        let rendered = evaluator
            .render(&condition.key, context)
            .map_err(|source| ReconcilerError::Condition { index, source })?;

        let equal = rendered == condition.value;
        debug!(
            resource.name = %resource.name(),
            condition = index,
            rendered = %rendered,
            expected = %condition.value,
            equal,
            "condition.evaluated"
        );
        if !equal {
            return Ok(ConditionVerdict::NotMet { index, rendered });
        }
    }

    Ok(ConditionVerdict::Met)
}
