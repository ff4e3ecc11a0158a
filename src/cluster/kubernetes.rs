//! # Kubernetes Resource Client
//!
//! [`ResourceClient`] backed by `kube` dynamic APIs (`Api<DynamicObject>`).

use super::{ResourceClient, ResourceDocument};
use crate::api::GroupVersionResource;
use crate::constants::LIST_PAGE_SIZE;
use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::{
    api::{Api, ApiResource, DeleteParams, ListParams},
    core::{DynamicObject, TypeMeta},
    Client,
};
use tracing::debug;

#[derive(Clone)]
pub struct KubeResourceClient {
    client: Client,
}

impl std::fmt::Debug for KubeResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeResourceClient").finish_non_exhaustive()
    }
}

impl KubeResourceClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, target: &GroupVersionResource, namespace: Option<&str>) -> Api<DynamicObject> {
        let resource = api_resource(target);
        match namespace {
            Some(ns) if !ns.is_empty() => {
                Api::namespaced_with(self.client.clone(), ns, &resource)
            }
            _ => Api::all_with(self.client.clone(), &resource),
        }
    }
}

/// Build the dynamic API descriptor for a group/version/resource
///
/// Only the plural is needed to address the endpoint; the kind is left empty.
fn api_resource(target: &GroupVersionResource) -> ApiResource {
    ApiResource {
        group: target.group.clone(),
        version: target.version.clone(),
        api_version: target.api_version(),
        kind: String::new(),
        plural: target.resource.clone(),
    }
}

/// Type metadata for the items of a list response
///
/// The API server omits `apiVersion` and `kind` on list items. The item kind
/// is the list kind without its `List` suffix.
fn item_type_meta(target: &GroupVersionResource, list_types: &TypeMeta) -> TypeMeta {
    let kind = list_types
        .kind
        .strip_suffix("List")
        .unwrap_or(&list_types.kind);
    TypeMeta {
        api_version: target.api_version(),
        kind: kind.to_string(),
    }
}

fn with_type_meta(mut item: DynamicObject, types: &TypeMeta) -> DynamicObject {
    let missing = item
        .types
        .as_ref()
        .map_or(true, |t| t.api_version.is_empty() || t.kind.is_empty());
    if missing && !types.kind.is_empty() {
        item.types = Some(types.clone());
    }
    item
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    async fn list(
        &self,
        target: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceDocument>> {
        let api = self.api(target, namespace);
        let mut documents = Vec::new();
        let mut continue_token: Option<String> = None;

        loop {
            let mut params = ListParams::default().limit(LIST_PAGE_SIZE);
            if let Some(token) = continue_token.as_deref() {
                params = params.continue_token(token);
            }

            let page = api.list(&params).await.with_context(|| {
                format!(
                    "Failed to list {target} in namespace '{}'",
                    namespace.unwrap_or("*")
                )
            })?;

            let item_types = item_type_meta(target, &page.types);
            for item in page.items {
                let raw = serde_json::to_value(with_type_meta(item, &item_types))
                    .with_context(|| format!("Failed to serialize {target} item"))?;
                documents.push(ResourceDocument::new(raw));
            }

            continue_token = page.metadata.continue_.filter(|token| !token.is_empty());
            if continue_token.is_none() {
                break;
            }
            debug!(gvr = %target, listed = documents.len(), "list.page.continue");
        }

        Ok(documents)
    }

    async fn delete(
        &self,
        target: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<()> {
        let api = self.api(target, Some(namespace));
        let params = DeleteParams {
            grace_period_seconds: Some(0),
            ..DeleteParams::default()
        };

        match api.delete(name, &params).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => {
                debug!(
                    resource.name = name,
                    resource.namespace = namespace,
                    "resource already gone"
                );
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to delete {target} '{name}' in namespace '{namespace}'")
            }),
        }
    }
}
