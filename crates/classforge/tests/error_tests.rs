//! Tests for run-level errors
//!
//! Only configuration and payload problems abort a run; these tests follow
//! them from the public entry points down to the error chain.

use classforge::core::{GenerationError, ProjectConfig};
use classforge::model::GraphExtractor;
use serde_json::json;

#[test]
fn test_empty_group_id() {
    let error = ProjectConfig::new("", "shop").validate().unwrap_err();
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Invalid configuration"));
    assert!(error_msg.contains("group id is empty"));
}

#[test]
fn test_invalid_group_segment() {
    let error = ProjectConfig::new("com.acme.2go", "shop").validate().unwrap_err();
    assert!(matches!(error, GenerationError::InvalidConfig { .. }));
    assert!(format!("{}", error).contains("`2go`"));
}

#[test]
fn test_project_name_without_letters() {
    let error = ProjectConfig::new("com.acme", "--").validate().unwrap_err();
    assert!(format!("{}", error).contains("at least one letter or digit"));
}

#[test]
fn test_non_object_payload() {
    let error = GraphExtractor::new().extract(&json!([1, 2])).unwrap_err();
    assert!(matches!(error, GenerationError::MalformedPayload { .. }));
    assert!(format!("{}", error).contains("diagram must be a JSON object"));
}

#[test]
fn test_nodes_not_an_array() {
    let error = GraphExtractor::new()
        .extract(&json!({ "nodes": "Order" }))
        .unwrap_err();
    assert_eq!(
        format!("{}", error),
        "Malformed diagram payload: `nodes` must be an array"
    );
}

#[test]
fn test_unreadable_config() {
    let error = GraphExtractor::new()
        .extract_config(&json!({ "config": { "groupId": 42 } }))
        .unwrap_err();
    assert!(matches!(error, GenerationError::InvalidConfig { .. }));
}

#[test]
fn test_build_error_chain() {
    let error = classforge::build(r#"{ "config": { "groupId": "com..acme" } }"#).unwrap_err();
    let chain = format!("{:#}", error);
    assert!(chain.starts_with("Invalid project configuration: "), "{}", chain);
    assert!(error.downcast_ref::<GenerationError>().is_some());
}

#[test]
fn test_report_error_message() {
    let report = classforge::generate(r#"{ "nodes": {} }"#);
    assert!(!report.success);
    assert!(report.files.is_empty());
    assert_eq!(
        report.error.as_deref(),
        Some("Failed to read diagram: Malformed diagram payload: `nodes` must be an array")
    );
}

#[test]
fn test_io_error() {
    use std::io;
    let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error: GenerationError = io_err.into();
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("IO error"));
    assert!(error_msg.contains("File not found"));
}
