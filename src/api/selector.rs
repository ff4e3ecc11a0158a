//! # Selectors
//!
//! Name and namespace matching for resource rules.
//!
//! A [`Selector`] carries at most one of `matchExact` / `matchRegex`. Leaving
//! both empty means "not configured": for namespaces that is a wildcard, for
//! names the owning rule is rejected (see
//! [`validate_rule`](crate::controller::validation::validate_rule)).

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which field of the target a selector applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorDimension {
    Name,
    Namespace,
}

impl SelectorDimension {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorDimension::Name => "name",
            SelectorDimension::Namespace => "namespace",
        }
    }
}

impl fmt::Display for SelectorDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("target name selector is missing: set matchExact or matchRegex")]
    MissingName,
    #[error("target {0} can only have one selector: matchExact or matchRegex")]
    Ambiguous(SelectorDimension),
    #[error("invalid regular expression '{pattern}' for resource {dimension}: {source}")]
    InvalidRegex {
        dimension: SelectorDimension,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Selector as written in the policy document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_exact: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_regex: String,
}

impl Selector {
    #[must_use]
    pub fn exact(value: &str) -> Self {
        Self {
            match_exact: value.to_string(),
            match_regex: String::new(),
        }
    }

    #[must_use]
    pub fn regex(pattern: &str) -> Self {
        Self {
            match_exact: String::new(),
            match_regex: pattern.to_string(),
        }
    }

    /// Neither `matchExact` nor `matchRegex` is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.match_exact.is_empty() && self.match_regex.is_empty()
    }

    /// Both `matchExact` and `matchRegex` are set
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        !self.match_exact.is_empty() && !self.match_regex.is_empty()
    }

    /// Exact value to push down to the list call, if any
    #[must_use]
    pub fn exact_value(&self) -> Option<&str> {
        (!self.match_exact.is_empty() && self.match_regex.is_empty())
            .then_some(self.match_exact.as_str())
    }

    /// Compile the selector once so it can be applied to many candidates
    pub fn compile(&self, dimension: SelectorDimension) -> Result<Matcher, SelectorError> {
        if self.is_ambiguous() {
            return Err(SelectorError::Ambiguous(dimension));
        }
        if !self.match_exact.is_empty() {
            return Ok(Matcher::Exact(self.match_exact.clone()));
        }
        if !self.match_regex.is_empty() {
            let regex =
                Regex::new(&self.match_regex).map_err(|source| SelectorError::InvalidRegex {
                    dimension,
                    pattern: self.match_regex.clone(),
                    source,
                })?;
            return Ok(Matcher::Regex(regex));
        }
        Ok(Matcher::Any)
    }
}

/// Compiled form of a [`Selector`]
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Selector not configured, every value matches
    Any,
    Exact(String),
    /// Unanchored search, same as the pattern engine's `is_match`
    Regex(Regex),
}

impl Matcher {
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Exact(expected) => candidate == expected,
            Matcher::Regex(regex) => regex.is_match(candidate),
        }
    }
}
