//! # Candidate Filtering
//!
//! Narrows a listed resource set to the resources a rule's selectors match.

use crate::cluster::ResourceDocument;
use crate::controller::validation::RuleMatchers;
use tracing::info;

/// Keep only the candidates whose namespace and name both match
///
/// Single `retain` pass: survivors keep their relative order and no element is
/// skipped or visited twice. Every dropped candidate is logged with the
/// selector it failed.
pub fn filter_candidates(candidates: &mut Vec<ResourceDocument>, matchers: &RuleMatchers) {
    candidates.retain(|candidate| {
        let failed = if !matchers.namespace.matches(candidate.namespace()) {
            "namespace"
        } else if !matchers.name.matches(candidate.name()) {
            "name"
        } else {
            return true;
        };
        info!(
            resource.name = %candidate.name(),
            resource.namespace = %candidate.namespace(),
            selector = failed,
            "resource does not match the {} selector",
            failed
        );
        false
    });
}
