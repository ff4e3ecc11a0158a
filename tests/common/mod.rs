//! Shared fakes and builders for integration tests
//!
//! - `FakeResourceClient`: in-memory cluster that records list and delete calls
//! - `PathEvaluator`: template evaluator resolving `{{ .a.b }}` paths only
//! - `LogBuffer`: captures formatted log lines for assertions
//! - builders for policy documents and resources

#![allow(dead_code, reason = "each test binary uses a different subset")]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hitman::prelude::*;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Pauses the first list call until released
#[derive(Debug, Default)]
pub struct ListGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Debug, Default)]
pub struct FakeResourceClient {
    resources: Mutex<HashMap<GroupVersionResource, Vec<ResourceDocument>>>,
    failing_lists: Mutex<HashSet<GroupVersionResource>>,
    failing_deletes: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<ListGate>>>,
    lists: Mutex<Vec<(GroupVersionResource, Option<String>)>>,
    deletes: Mutex<Vec<String>>,
}

impl FakeResourceClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, gvr: &GroupVersionResource, document: ResourceDocument) {
        self.resources
            .lock()
            .unwrap()
            .entry(gvr.clone())
            .or_default()
            .push(document);
    }

    pub fn fail_list(&self, gvr: &GroupVersionResource) {
        self.failing_lists.lock().unwrap().insert(gvr.clone());
    }

    /// Make deletes of `namespace/name` fail
    pub fn fail_delete(&self, key: &str) {
        self.failing_deletes.lock().unwrap().insert(key.to_string());
    }

    pub fn gate_first_list(&self) -> Arc<ListGate> {
        let gate = Arc::new(ListGate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Recorded list calls
    pub fn lists(&self) -> Vec<(GroupVersionResource, Option<String>)> {
        self.lists.lock().unwrap().clone()
    }

    /// Recorded delete calls as `namespace/name`
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceClient for FakeResourceClient {
    async fn list(
        &self,
        target: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<ResourceDocument>> {
        self.lists
            .lock()
            .unwrap()
            .push((target.clone(), namespace.map(str::to_string)));

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.failing_lists.lock().unwrap().contains(target) {
            return Err(anyhow!("the server is currently unable to handle the request"));
        }

        let resources = self.resources.lock().unwrap();
        Ok(resources
            .get(target)
            .map(|docs| {
                docs.iter()
                    .filter(|d| namespace.map_or(true, |ns| d.namespace() == ns))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(
        &self,
        target: &GroupVersionResource,
        namespace: &str,
        name: &str,
    ) -> Result<()> {
        let key = format!("{namespace}/{name}");
        if self.failing_deletes.lock().unwrap().contains(&key) {
            return Err(anyhow!("deployments.apps \"{name}\" is forbidden"));
        }
        self.deletes.lock().unwrap().push(key);
        if let Some(docs) = self.resources.lock().unwrap().get_mut(target) {
            docs.retain(|d| !(d.namespace() == namespace && d.name() == name));
        }
        Ok(())
    }
}

/// Resolves templates of the exact form `{{ .a.b.c }}` against the context
///
/// Other templates render verbatim; templates containing `fail` error out.
#[derive(Debug, Default)]
pub struct PathEvaluator;

impl TemplateEvaluator for PathEvaluator {
    fn render(&self, template: &str, context: &mut TemplateContext) -> Result<String, TemplateError> {
        if template.contains("fail") {
            return Err(TemplateError::new(template, "forced failure"));
        }
        let trimmed = template.trim();
        let Some(path) = trimmed
            .strip_prefix("{{")
            .and_then(|t| t.strip_suffix("}}"))
            .map(str::trim)
            .and_then(|t| t.strip_prefix('.'))
        else {
            return Ok(template.to_string());
        };

        let mut segments = path.split('.');
        let root = segments.next().and_then(|key| context.get(key));
        let value = segments.fold(root, |current, key| current.and_then(|v| v.get(key)));
        Ok(match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }
}

/// Cluster holding `tmp-a` (0 replicas), `tmp-b` (2) and `keep-c` (0) in `default`
pub fn seeded_client() -> Arc<FakeResourceClient> {
    let client = FakeResourceClient::new();
    client.add(&deployments(), deployment("default", "tmp-a", 0));
    client.add(&deployments(), deployment("default", "tmp-b", 2));
    client.add(&deployments(), deployment("default", "keep-c", 0));
    client
}

pub fn deployments() -> GroupVersionResource {
    GroupVersionResource::new("apps", "v1", "deployments")
}

pub fn deployment(namespace: &str, name: &str, replicas: i64) -> ResourceDocument {
    ResourceDocument::new(json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": name, "namespace": namespace},
        "status": {"replicas": replicas}
    }))
}

pub fn condition(key: &str, value: &str) -> Condition {
    Condition {
        key: key.to_string(),
        value: value.to_string(),
    }
}

pub fn deployment_rule(name: Selector, namespace: Selector, conditions: Vec<Condition>) -> ResourceRule {
    let gvr = deployments();
    ResourceRule {
        target: Target {
            group: gvr.group,
            version: gvr.version,
            resource: gvr.resource,
            name,
            namespace,
        },
        pre_step: String::new(),
        conditions,
    }
}

/// Normalised policy document holding `rules`
pub fn policy(name: &str, rules: Vec<ResourceRule>) -> Configuration {
    let mut config = hitman::config::parse_configuration(&format!(
        "metadata:\n  name: {name}\nspec:\n  synchronization:\n    time: 1h\n    processingDelay: 1ms\n"
    ))
    .unwrap();
    config.spec.resources = rules;
    config
}

pub fn reconciler(
    client: Arc<FakeResourceClient>,
    evaluator: Arc<dyn TemplateEvaluator>,
    dry_run: bool,
) -> Reconciler {
    let config = ControllerConfig {
        dry_run,
        ..ControllerConfig::default()
    };
    Reconciler::new(client, evaluator, &config)
}

/// In-memory sink for a plain-text `tracing` subscriber
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Install a thread-local INFO subscriber writing into this buffer
    ///
    /// Logs are captured until the returned guard drops. Tests using it must
    /// run on the current-thread runtime.
    pub fn capture(&self) -> tracing::subscriber::DefaultGuard {
        let buffer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || buffer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
