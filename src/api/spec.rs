//! # Policy Document
//!
//! Data model of the policy document read from disk.
//!
//! Documents are immutable once loaded: the policy store replaces the active
//! instance wholesale on reload and never mutates it in place.

use crate::api::selector::Selector;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Root policy document
///
/// # Example
///
/// ```yaml
/// apiVersion: hitman.freepik.com/v1alpha1
/// kind: Config
/// metadata:
///   name: cleanup
/// spec:
///   synchronization:
///     time: "1m"
///   resources:
///     - target:
///         group: apps
///         version: v1
///         resource: deployments
///         name:
///           matchRegex: "^tmp-.*"
///       conditions:
///         - key: "{{ .object.status.replicas }}"
///           value: "0"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Opaque versioning field
    #[serde(default)]
    pub api_version: String,
    /// Opaque kind field
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: ConfigurationSpec,
}

impl Configuration {
    /// Interval between two reconciliation cycles (valid once the document is normalised)
    #[must_use]
    pub fn sync_interval(&self) -> Duration {
        self.spec.synchronization.time_duration
    }

    /// Pause inserted between consecutive rules of a cycle
    #[must_use]
    pub fn processing_delay(&self) -> Duration {
        self.spec.synchronization.processing_delay_duration
    }

    /// Display name of the document for log lines
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.metadata.name.is_empty() {
            "unnamed"
        } else {
            &self.metadata.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    #[serde(default)]
    pub synchronization: Synchronization,
    /// Rules evaluated in order on every cycle
    #[serde(default)]
    pub resources: Vec<ResourceRule>,
}

/// Reconciliation cadence
///
/// The string fields hold what the document declared (or the defaults filled in
/// by the loader); the duration fields hold their parsed values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Synchronization {
    /// Interval between cycles, e.g. `1m` or `30s`
    #[serde(default)]
    pub time: String,
    /// Older spelling of `time`, used only when `time` is unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interval: String,
    /// Pause between consecutive rules, e.g. `1s`
    #[serde(default)]
    pub processing_delay: String,
    #[serde(skip)]
    pub time_duration: Duration,
    #[serde(skip)]
    pub processing_delay_duration: Duration,
}

/// One deletion rule: what to look at and when to delete it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRule {
    #[serde(default)]
    pub target: Target,
    /// Template rendered once per rule with `targets` bound to the filtered candidates
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pre_step: String,
    /// All conditions must hold for a resource to be deleted
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub name: Selector,
    #[serde(default)]
    pub namespace: Selector,
}

impl Target {
    #[must_use]
    pub fn gvr(&self) -> GroupVersionResource {
        GroupVersionResource {
            group: self.group.clone(),
            version: self.version.clone(),
            resource: self.resource.clone(),
        }
    }
}

/// A condition holds when rendering `key` yields exactly `value`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Group/version/resource triple addressing a resource kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    #[must_use]
    pub fn new(group: &str, version: &str, resource: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            resource: resource.to_string(),
        }
    }

    /// `apiVersion` form: `group/version`, or just `version` for the core group
    #[must_use]
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.resource)
    }
}
