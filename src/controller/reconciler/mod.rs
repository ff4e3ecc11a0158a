//! # Reconciler
//!
//! Runs one reconciliation cycle over a policy snapshot.
//!
//! ## Per-rule flow
//!
//! 1. Selector gate: a missing name selector or an ambiguous selector skips the rule
//! 2. List the rule's resource kind, narrowed to the namespace for exact namespace selectors
//! 3. Compile the selectors (an invalid regex skips the rule)
//! 4. Filter candidates by namespace and name
//! 5. Render the optional pre-step with `targets` bound to the candidates
//! 6. For each candidate: bind `object`, evaluate conditions, delete (or log in dry-run)
//!
//! Failures never leave the rule (or resource) they belong to: a cycle always
//! visits every rule.

pub mod deletion;
pub mod evaluation;
pub mod filter;
pub mod types;

pub use deletion::delete_resource;
pub use evaluation::{evaluate_conditions, run_pre_step, ConditionVerdict};
pub use filter::filter_candidates;
pub use types::{
    ReconcilerError, ResourceOutcome, ResourceReport, RuleOutcome, RuleReport, SyncReport,
};

use crate::api::{Configuration, GroupVersionResource, ResourceRule};
use crate::cluster::{ResourceClient, ResourceDocument};
use crate::config::ControllerConfig;
use crate::controller::validation::{compile_rule, validate_rule};
use crate::template::{TemplateContext, TemplateEvaluator};
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

/// Reconciliation engine
///
/// Holds its collaborators and the dry-run flag; the rules come from the
/// snapshot passed to [`Reconciler::sync_resources`].
#[derive(Clone)]
pub struct Reconciler {
    client: Arc<dyn ResourceClient>,
    evaluator: Arc<dyn TemplateEvaluator>,
    dry_run: bool,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(
        client: Arc<dyn ResourceClient>,
        evaluator: Arc<dyn TemplateEvaluator>,
        config: &ControllerConfig,
    ) -> Self {
        Self {
            client,
            evaluator,
            dry_run: config.dry_run,
        }
    }

    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Process every rule of `config` in order
    ///
    /// `config` is the cycle's snapshot; it is read once and never re-fetched,
    /// so a reload landing mid-cycle does not affect this pass.
    pub async fn sync_resources(&self, config: &Configuration) -> SyncReport {
        let span = tracing::info_span!(
            "reconcile.cycle",
            policy = %config.display_name(),
            dry_run = self.dry_run
        );
        self.sync_rules(config).instrument(span).await
    }

    async fn sync_rules(&self, config: &Configuration) -> SyncReport {
        let delay = config.processing_delay();
        let mut report = SyncReport::default();

        for (index, rule) in config.spec.resources.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let gvr = rule.target.gvr();
            let span = tracing::info_span!("reconcile.rule", rule = index, gvr = %gvr);
            let outcome = match self.process_rule(index, rule, &gvr).instrument(span).await {
                Ok(resources) => RuleOutcome::Processed(resources),
                Err(e) => {
                    warn!(rule = index, gvr = %gvr, "Skipping rule: {}", e);
                    RuleOutcome::Skipped(e)
                }
            };
            report.rules.push(RuleReport {
                index,
                gvr,
                outcome,
            });
        }

        report
    }

    async fn process_rule(
        &self,
        index: usize,
        rule: &ResourceRule,
        gvr: &GroupVersionResource,
    ) -> Result<Vec<ResourceReport>, ReconcilerError> {
        validate_rule(rule)?;

        let namespace = rule.target.namespace.exact_value();
        let mut candidates = self
            .client
            .list(gvr, namespace)
            .await
            .map_err(|source| ReconcilerError::List {
                gvr: gvr.clone(),
                source,
            })?;
        let listed = candidates.len();

        let matchers = compile_rule(rule)?;
        filter_candidates(&mut candidates, &matchers);
        debug!(
            rule = index,
            gvr = %gvr,
            listed,
            matched = candidates.len(),
            "rule.candidates"
        );

        let mut context = TemplateContext::new();
        run_pre_step(
            self.evaluator.as_ref(),
            &rule.pre_step,
            &candidates,
            &mut context,
        )?;

        let mut resources = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let outcome = self.process_resource(rule, gvr, candidate, &mut context).await;
            resources.push(ResourceReport {
                name: candidate.name().to_string(),
                namespace: candidate.namespace().to_string(),
                outcome,
            });
        }
        Ok(resources)
    }

    async fn process_resource(
        &self,
        rule: &ResourceRule,
        gvr: &GroupVersionResource,
        resource: &ResourceDocument,
        context: &mut TemplateContext,
    ) -> ResourceOutcome {
        match evaluate_conditions(
            self.evaluator.as_ref(),
            &rule.conditions,
            resource,
            context,
        ) {
            Ok(ConditionVerdict::Met) => {
                delete_resource(self.client.as_ref(), gvr, resource, self.dry_run).await
            }
            Ok(ConditionVerdict::NotMet { index, rendered }) => {
                info!(
                    gvr = %gvr,
                    resource.name = %resource.name(),
                    resource.namespace = %resource.namespace(),
                    "resource did NOT meet the conditions"
                );
                ResourceOutcome::ConditionsNotMet { index, rendered }
            }
            Err(e) => {
                error!(
                    gvr = %gvr,
                    resource.name = %resource.name(),
                    resource.namespace = %resource.namespace(),
                    "Failed to evaluate conditions: {}",
                    e
                );
                ResourceOutcome::EvaluationFailed(e)
            }
        }
    }
}
