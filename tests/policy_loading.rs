//! # Policy Loading Tests
//!
//! Document parsing, defaulting and first-load behaviour.

use hitman::config::{parse_configuration, ConfigLoadError, ConfigLoader};
use hitman::controller::validation::DurationError;
use std::io::Write;
use std::time::Duration;

const FULL_DOCUMENT: &str = r#"
apiVersion: hitman.freepik.com/v1alpha1
kind: Config
metadata:
  name: example
spec:
  synchronization:
    time: "10m"
    processingDelay: "500ms"
  resources:
    - target:
        group: apps
        version: v1
        resource: deployments
        name:
          matchRegex: "^tmp-.*"
        namespace:
          matchExact: default
      preStep: |
        {{ set "limit" 3 }}
      conditions:
        - key: "{{ .object.status.replicas }}"
          value: "0"
"#;

#[test]
fn test_full_document() {
    let config = parse_configuration(FULL_DOCUMENT).unwrap();
    assert_eq!(config.display_name(), "example");
    assert_eq!(config.sync_interval(), Duration::from_secs(600));
    assert_eq!(config.processing_delay(), Duration::from_millis(500));

    let rule = &config.spec.resources[0];
    assert_eq!(rule.target.gvr().to_string(), "apps/v1/deployments");
    assert_eq!(rule.target.name.match_regex, "^tmp-.*");
    assert_eq!(rule.target.namespace.exact_value(), Some("default"));
    assert!(rule.pre_step.contains("set"));
    assert_eq!(rule.conditions[0].value, "0");
}

#[test]
fn test_absent_time_uses_default_interval() {
    let config = parse_configuration(
        "spec:\n  resources:\n    - target: {group: apps, version: v1, resource: deployments, name: {matchExact: web}}\n",
    )
    .unwrap();
    assert_eq!(config.spec.synchronization.time, "1m");
    assert_eq!(config.sync_interval(), Duration::from_secs(60));
}

#[test]
fn test_interval_spelling_and_day_unit() {
    let config = parse_configuration("spec:\n  synchronization:\n    interval: 1d\n").unwrap();
    assert_eq!(config.sync_interval(), Duration::from_secs(86_400));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let config = parse_configuration(
        "status: {}\nspec:\n  extra: true\n  synchronization:\n    time: 30s\n    jitter: 5s\n",
    )
    .unwrap();
    assert_eq!(config.sync_interval(), Duration::from_secs(30));
}

#[test]
fn test_bad_duration_is_reported_with_field() {
    let err = parse_configuration("spec:\n  synchronization:\n    processingDelay: fast\n")
        .unwrap_err();
    match err {
        ConfigLoadError::InvalidDuration { field, source } => {
            assert_eq!(field, "processingDelay");
            assert!(matches!(source, DurationError::InvalidFormat(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_loader_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FULL_DOCUMENT.as_bytes()).unwrap();

    let config = ConfigLoader::from_path(file.path()).load().await.unwrap();
    assert_eq!(config.spec.resources.len(), 1);
}

#[tokio::test]
async fn test_loader_keeps_rules_with_selector_issues() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        b"spec:\n  resources:\n    - target: {group: apps, version: v1, resource: deployments}\n",
    )
    .unwrap();

    let config = ConfigLoader::from_path(file.path()).load().await.unwrap();
    assert_eq!(config.spec.resources.len(), 1);
    assert_eq!(hitman::config::rule_issues(&config).len(), 1);
}
