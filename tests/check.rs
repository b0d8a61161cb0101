use clap::Parser;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use datalens::cli::{CheckError, check_file, render_issues, run_check};
use datalens::config::{AppConfig, CliArgs, Command};
use datalens::schema::{Payload, UnknownKeys, ValidationOptions};

#[test]
fn test_check_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viz.json");
    fs::write(
        &path,
        json!({ "queryId": "q-1", "type": "pie", "title": "Share of sales" }).to_string(),
    )
    .unwrap();

    let payload = check_file("insert-visualization", &path, &ValidationOptions::default()).unwrap();
    match payload {
        Payload::InsertVisualization(viz) => assert_eq!(viz.title.as_deref(), Some("Share of sales")),
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_check_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("query.json");
    fs::write(&path, json!({ "datasetId": 3 }).to_string()).unwrap();

    let err = match check_file("insert-query", &path, &ValidationOptions::default()) {
        Err(CheckError::Invalid(err)) => err,
        other => panic!("expected a validation failure, got {:?}", other),
    };
    assert_eq!(
        render_issues(&err),
        "  sql: Required\n  datasetId: Expected string, received number"
    );
}

#[test]
fn test_run_check_reports_invalid_payload_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("query.json");
    fs::write(&path, json!({ "datasetId": 3 }).to_string()).unwrap();

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let valid = run_check("insert-query", &path, &ValidationOptions::default(), &mut out, &mut err).unwrap();

    assert!(!valid);
    assert!(out.is_empty());
    let err = String::from_utf8(err).unwrap();
    assert_eq!(
        err,
        format!(
            "{} is not a valid insert-query payload:\n  sql: Required\n  datasetId: Expected string, received number\n",
            path.display()
        )
    );
    assert_eq!(err.matches("sql: Required").count(), 1);
}

#[test]
fn test_run_check_prints_valid_payload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("share.json");
    fs::write(&path, json!({ "visualizationId": "viz-1", "shareToken": "dropped" }).to_string()).unwrap();

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let valid = run_check("insert-share", &path, &ValidationOptions::default(), &mut out, &mut err).unwrap();

    assert!(valid);
    assert!(err.is_empty());
    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed, json!({ "visualizationId": "viz-1", "isPublic": true }));
}

#[test]
fn test_run_check_returns_other_failures() {
    let dir = TempDir::new().unwrap();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let result = run_check(
        "query",
        &dir.path().join("missing.json"),
        &ValidationOptions::default(),
        &mut out,
        &mut err,
    );

    assert!(matches!(result, Err(CheckError::Io(_))));
    assert!(out.is_empty());
    assert!(err.is_empty());
}

#[test]
fn test_check_malformed_json_and_unknown_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"sql\": ").unwrap();

    assert!(matches!(
        check_file("query", &path, &ValidationOptions::default()),
        Err(CheckError::Json(_))
    ));
    assert!(matches!(
        check_file("report", &path, &ValidationOptions::default()),
        Err(CheckError::UnknownShape(name)) if name == "report"
    ));
    assert!(matches!(
        check_file("query", &dir.path().join("missing.json"), &ValidationOptions::default()),
        Err(CheckError::Io(_))
    ));
}

#[test]
fn test_config_file_and_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("datalens.toml");
    fs::write(
        &path,
        r#"
[web]
host = "0.0.0.0"
port = 8088

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let args = CliArgs::parse_from([
        "datalens",
        "--config",
        path.to_str().unwrap(),
        "--port",
        "9000",
        "--reject-unknown-keys",
        "check",
        "--shape",
        "share",
        "payload.json",
    ]);
    let config = AppConfig::new(&args).unwrap();

    assert_eq!(config.web.host, "0.0.0.0");
    assert_eq!(config.web.port, 9000);
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.json);
    assert_eq!(config.validation.unknown_keys, UnknownKeys::Reject);
    assert_eq!(
        args.command,
        Some(Command::Check {
            shape: "share".into(),
            file: "payload.json".into(),
        })
    );
}

#[test]
fn test_config_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").unwrap();

    let args = CliArgs::parse_from(["datalens", "--config", path.to_str().unwrap()]);
    let config = AppConfig::new(&args).unwrap();

    assert_eq!(config, AppConfig::default());
    assert!(args.command.is_none());
}
