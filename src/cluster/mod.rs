//! # Cluster Access
//!
//! The reconciler reaches the cluster through the [`ResourceClient`] trait.
//! [`KubeResourceClient`] implements it on top of `kube` dynamic APIs.

mod kubernetes;

pub use self::kubernetes::KubeResourceClient;

use crate::api::GroupVersionResource;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A listed resource: its raw document plus the identity fields the
/// reconciler needs for matching and deletion
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDocument {
    name: String,
    namespace: String,
    raw: Value,
}

impl ResourceDocument {
    /// Build from a raw document, reading `metadata.name` and `metadata.namespace`
    ///
    /// Cluster-scoped resources have an empty namespace.
    #[must_use]
    pub fn new(raw: Value) -> Self {
        let field = |key: &str| {
            raw.pointer(&format!("/metadata/{key}"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            name: field("name"),
            namespace: field("namespace"),
            raw,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

/// Lists and deletes resources identified by group/version/resource
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// List every resource of the kind, restricted to `namespace` when given
    async fn list(
        &self,
        target: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceDocument>>;

    /// Delete one resource immediately (no grace period)
    ///
    /// An empty `namespace` addresses a cluster-scoped resource.
    async fn delete(&self, target: &GroupVersionResource, namespace: &str, name: &str)
        -> Result<()>;
}
