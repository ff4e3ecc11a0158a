//! # Types
//!
//! Errors and reports produced by a reconciliation cycle.

use crate::api::{GroupVersionResource, SelectorError};
use crate::template::TemplateError;
use thiserror::Error;

/// Rule- or resource-level failure
///
/// None of these abort a cycle: selector, list and pre-step errors skip the
/// owning rule, condition and delete errors skip the owning resource.
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
    #[error("failed to list {gvr}: {source:#}")]
    List {
        gvr: GroupVersionResource,
        #[source]
        source: anyhow::Error,
    },
    #[error("pre-step failed: {0}")]
    PreStep(#[source] TemplateError),
    #[error("condition #{index} failed to render: {source}")]
    Condition {
        index: usize,
        #[source]
        source: TemplateError,
    },
    #[error("failed to delete: {0:#}")]
    Delete(#[source] anyhow::Error),
}

/// What happened to one filtered candidate
#[derive(Debug)]
pub enum ResourceOutcome {
    Deleted,
    /// Every condition held but dry-run prevented the delete
    DryRun,
    /// The condition at `index` rendered to something other than its value
    ConditionsNotMet { index: usize, rendered: String },
    EvaluationFailed(ReconcilerError),
    DeleteFailed(ReconcilerError),
}

#[derive(Debug)]
pub struct ResourceReport {
    pub name: String,
    pub namespace: String,
    pub outcome: ResourceOutcome,
}

#[derive(Debug)]
pub enum RuleOutcome {
    /// The rule ran; one report per filtered candidate, in list order
    Processed(Vec<ResourceReport>),
    Skipped(ReconcilerError),
}

#[derive(Debug)]
pub struct RuleReport {
    /// Position of the rule in the policy document
    pub index: usize,
    pub gvr: GroupVersionResource,
    pub outcome: RuleOutcome,
}

impl RuleReport {
    /// Resource reports of a processed rule (empty for skipped rules)
    #[must_use]
    pub fn resources(&self) -> &[ResourceReport] {
        match &self.outcome {
            RuleOutcome::Processed(resources) => resources,
            RuleOutcome::Skipped(_) => &[],
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, RuleOutcome::Skipped(_))
    }
}

/// Result of one full pass over the policy rules
#[derive(Debug, Default)]
pub struct SyncReport {
    pub rules: Vec<RuleReport>,
}

impl SyncReport {
    fn count(&self, predicate: impl Fn(&ResourceOutcome) -> bool) -> usize {
        self.rules
            .iter()
            .flat_map(RuleReport::resources)
            .filter(|r| predicate(&r.outcome))
            .count()
    }

    #[must_use]
    pub fn rules_skipped(&self) -> usize {
        self.rules.iter().filter(|r| r.is_skipped()).count()
    }

    /// Candidates that survived selector filtering
    #[must_use]
    pub fn candidates(&self) -> usize {
        self.rules.iter().map(|r| r.resources().len()).sum()
    }

    #[must_use]
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Deleted))
    }

    #[must_use]
    pub fn dry_run(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::DryRun))
    }

    #[must_use]
    pub fn conditions_not_met(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::ConditionsNotMet { .. }))
    }

    /// Resources whose evaluation or delete failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ResourceOutcome::EvaluationFailed(_) | ResourceOutcome::DeleteFailed(_)
            )
        })
    }

    /// Names (`namespace/name`) of the resources deleted this cycle
    #[must_use]
    pub fn deleted_resources(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(RuleReport::resources)
            .filter(|r| matches!(r.outcome, ResourceOutcome::Deleted))
            .map(|r| {
                if r.namespace.is_empty() {
                    r.name.clone()
                } else {
                    format!("{}/{}", r.namespace, r.name)
                }
            })
            .collect()
    }
}
