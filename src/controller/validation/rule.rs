//! # Rule Validation
//!
//! Selector gate applied to every rule before it touches the cluster.

use crate::api::{Matcher, ResourceRule, SelectorDimension, SelectorError};

/// Check the selector invariants of a rule
///
/// - The name selector must be configured. An unconstrained name would match
///   (and delete) every resource of the kind.
/// - Name and namespace selectors may each set at most one of
///   `matchExact` / `matchRegex`.
///
/// An empty namespace selector is valid and means "all namespaces".
pub fn validate_rule(rule: &ResourceRule) -> Result<(), SelectorError> {
    let target = &rule.target;
    if target.name.is_empty() {
        return Err(SelectorError::MissingName);
    }
    if target.name.is_ambiguous() {
        return Err(SelectorError::Ambiguous(SelectorDimension::Name));
    }
    if target.namespace.is_ambiguous() {
        return Err(SelectorError::Ambiguous(SelectorDimension::Namespace));
    }
    Ok(())
}

/// Compiled name and namespace matchers of a rule
#[derive(Debug, Clone)]
pub struct RuleMatchers {
    pub name: Matcher,
    pub namespace: Matcher,
}

/// Validate a rule and compile both selectors
pub fn compile_rule(rule: &ResourceRule) -> Result<RuleMatchers, SelectorError> {
    validate_rule(rule)?;
    Ok(RuleMatchers {
        name: rule.target.name.compile(SelectorDimension::Name)?,
        namespace: rule
            .target
            .namespace
            .compile(SelectorDimension::Namespace)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Selector, Target};

    fn rule_with(name: Selector, namespace: Selector) -> ResourceRule {
        ResourceRule {
            target: Target {
                group: "apps".to_string(),
                version: "v1".to_string(),
                resource: "deployments".to_string(),
                name,
                namespace,
            },
            ..ResourceRule::default()
        }
    }

    #[test]
    fn test_missing_name_selector_is_rejected() {
        let rule = rule_with(Selector::default(), Selector::exact("default"));
        assert!(matches!(validate_rule(&rule), Err(SelectorError::MissingName)));
    }

    #[test]
    fn test_missing_namespace_selector_is_wildcard() {
        let rule = rule_with(Selector::exact("web"), Selector::default());
        assert!(validate_rule(&rule).is_ok());
        let matchers = compile_rule(&rule).unwrap();
        assert!(matchers.namespace.matches("any-namespace"));
        assert!(matchers.namespace.matches(""));
    }

    #[test]
    fn test_ambiguous_selectors_are_rejected() {
        let both = Selector {
            match_exact: "a".to_string(),
            match_regex: "^a".to_string(),
        };
        let rule = rule_with(both.clone(), Selector::default());
        assert!(matches!(
            validate_rule(&rule),
            Err(SelectorError::Ambiguous(SelectorDimension::Name))
        ));

        let rule = rule_with(Selector::exact("a"), both);
        assert!(matches!(
            validate_rule(&rule),
            Err(SelectorError::Ambiguous(SelectorDimension::Namespace))
        ));
    }

    #[test]
    fn test_invalid_regex_fails_compilation() {
        let rule = rule_with(Selector::exact("a"), Selector::regex("(unclosed"));
        assert!(validate_rule(&rule).is_ok());
        assert!(matches!(
            compile_rule(&rule),
            Err(SelectorError::InvalidRegex {
                dimension: SelectorDimension::Namespace,
                ..
            })
        ));
    }
}
