//! CLI binary integration tests using assert_cmd + predicates.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("jsonschema-ref").expect("binary should exist")
}

// ── Resolve ─────────────────────────────────────────────────────────────────

#[test]
fn test_resolve_sibling_file() {
    cmd()
        .args(["resolve", "--scope", "http://x.y.z/schema/parent.json", "child.json"])
        .assert()
        .success()
        .stdout("http://x.y.z/schema/child.json\n");
}

#[test]
fn test_resolve_without_scope_returns_segment() {
    cmd()
        .args(["resolve", "http://a.b.c"])
        .assert()
        .success()
        .stdout("http://a.b.c\n");
}

#[test]
fn test_resolve_chains_segments() {
    cmd()
        .args([
            "resolve",
            "http://example.com/schemas/root.json",
            "nested/",
            "item.json#/x",
        ])
        .assert()
        .success()
        .stdout("http://example.com/schemas/nested/item.json#/x\n");
}

#[test]
fn test_resolve_steps_as_json() {
    let output = cmd()
        .args([
            "resolve",
            "--steps",
            "--format",
            "compact",
            "--scope",
            "classpath://hello/world.json",
            "#/definitions/A",
        ])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let steps: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(steps[0]["scope"], "classpath://hello/world.json");
    assert_eq!(steps[0]["ref"], "#/definitions/A");
    assert_eq!(
        steps[0]["resolved"],
        "classpath://hello/world.json#/definitions/A"
    );
}

#[test]
fn test_resolve_steps_pretty_by_default() {
    let output = cmd()
        .args(["resolve", "--steps", "http://example.com/schemas/root.json", "nested/"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    assert!(stdout.contains("\n  {"), "pretty output should be indented: {}", stdout);
    assert!(stdout.ends_with("]\n"));

    let steps: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(steps.as_array().map(Vec::len), Some(2));
    assert!(steps[0]["scope"].is_null());
    assert_eq!(steps[1]["scope"], "http://example.com/schemas/root.json");
    assert_eq!(steps[1]["resolved"], "http://example.com/schemas/nested/");
}

#[test]
fn test_resolve_rejects_unknown_format() {
    cmd()
        .args(["resolve", "--steps", "--format", "json", "child.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'json'"));
}

#[test]
fn test_resolve_relative_scope_keeps_parent_segments() {
    cmd()
        .args(["resolve", "--scope", "../schemas/root.json", "child.json"])
        .assert()
        .success()
        .stdout("../schemas/child.json\n");
}

#[test]
fn test_resolve_keep_dot_segments() {
    cmd()
        .args(["--keep-dot-segments", "resolve", "--scope", "http://a/b/c", "../d"])
        .assert()
        .success()
        .stdout("http://a/b/../d\n");

    cmd()
        .args(["resolve", "--scope", "http://a/b/c", "../d"])
        .assert()
        .success()
        .stdout("http://a/d\n");
}

#[test]
fn test_resolve_malformed_scope_fails() {
    cmd()
        .args(["resolve", "--scope", "\\\\bad scope", "segment"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Resolution failed"))
        .stderr(predicate::str::contains("Illegal character"));
}

// ── Parse ───────────────────────────────────────────────────────────────────

#[test]
fn test_parse_prints_components() {
    let output = cmd()
        .args(["parse", "classpath:/hello/world.json/"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let components: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(components["scheme"], "classpath");
    assert!(components["authority"].is_null());
    assert_eq!(components["path"], "/hello/world.json/");
    assert_eq!(components["absolute"], true);
}

#[test]
fn test_parse_invalid_uri_fails() {
    cmd()
        .args(["parse", "http://x/a b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse failed"));
}

// ── Batch ───────────────────────────────────────────────────────────────────

#[test]
fn test_batch_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("refs.json");
    let output = dir.path().join("out.json");

    let batch = serde_json::json!([
        { "scope": "http://x.y.z/root.json", "ref": "#foo" },
        { "scope": null, "ref": "http://a.b.c" },
        { "scope": "http://example.com", "ref": "\\\\bad" }
    ]);
    fs::write(&input, batch.to_string()).unwrap();

    cmd()
        .args(["batch", input.to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&output).expect("output file should exist");
    let results: serde_json::Value =
        serde_json::from_str(&content).expect("output should be valid JSON");

    assert_eq!(results[0]["resolved"], "http://x.y.z/root.json#foo");
    assert_eq!(results[1]["resolved"], "http://a.b.c");
    assert!(results[2].get("resolved").is_none());
    assert_eq!(results[2]["error"]["code"], "malformed_reference");
    assert_eq!(results[2]["error"]["index"], 0);
}

#[test]
fn test_batch_missing_file_fails() {
    cmd()
        .args(["batch", "/nonexistent/refs.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_batch_invalid_json_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("refs.json");
    fs::write(&input, "{ not json").unwrap();

    cmd()
        .args(["batch", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse batch"));
}
