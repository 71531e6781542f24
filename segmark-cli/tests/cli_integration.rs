//! Integration tests for the segmark CLI

use assert_cmd::Command;
use predicates::prelude::*;
use segmark_core::normalize::normalize;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn segmark() -> Command {
    let mut cmd = Command::cargo_bin("segmark").unwrap();
    cmd.env_remove("SEGMARK_CONFIG");
    cmd
}

/// Run `chunk` with JSON output and return the parsed records
fn chunk_json(extra: &[&str], fixture: &str) -> Vec<Value> {
    let output = segmark()
        .args(["chunk", "-q", "-f", "json", "-i", &fixture_path(fixture)])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    match serde_json::from_slice(&output.stdout).unwrap() {
        Value::Array(records) => records,
        other => panic!("expected array, got {other}"),
    }
}

#[test]
fn test_chunk_text_output() {
    segmark()
        .arg("chunk")
        .arg("-i")
        .arg(fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--- tests/fixtures/article.html #0 ---",
        ))
        .stdout(predicate::str::contains("<h1>Release notes</h1>"));
}

#[test]
fn test_chunks_reconstruct_normalized_input() {
    let records = chunk_json(&["--max-chars", "60"], "article.html");
    assert!(records.len() > 1);

    let joined: String = records
        .iter()
        .map(|r| r["markup"].as_str().unwrap())
        .collect();
    let source = fs::read_to_string(fixture_path("article.html")).unwrap();
    assert_eq!(joined, normalize(&source));

    for record in &records {
        assert!(record.get("tail").is_none());
    }
}

#[test]
fn test_raw_output_exposes_tails() {
    let records = chunk_json(&["--max-chars", "60", "--raw"], "article.html");

    assert!(records.iter().all(|r| r.get("cut").is_some()));
    assert!(records
        .iter()
        .any(|r| !r["tail"].as_str().unwrap().is_empty()));
}

#[test]
fn test_japanese_sentence_boundary() {
    let records = chunk_json(&["--max-chars", "20"], "japanese.html");

    assert_eq!(records[0]["markup"], "<p>これはテストです。");
    assert_eq!(records[0]["text"], "これはテストです。");
    assert!(records[1]["markup"]
        .as_str()
        .unwrap()
        .starts_with("日本語の文章"));
}

#[test]
fn test_markdown_output() {
    segmark()
        .args(["chunk", "-f", "markdown", "--max-chars", "80"])
        .arg("-i")
        .arg(fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("```html"))
        .stdout(predicate::str::contains("---"))
        .stdout(predicate::str::contains("*Total chunks:"));
}

#[test]
fn test_custom_rules_file() {
    segmark()
        .args(["chunk", "--max-chars", "40", "--rules"])
        .arg(fixture_path("rules.toml"))
        .arg("-i")
        .arg(fixture_path("japanese.html"))
        .assert()
        .success();
}

#[test]
fn test_output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("chunks.json");

    segmark()
        .args(["chunk", "-f", "json", "-i"])
        .arg(fixture_path("article.html"))
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&output_path).unwrap();
    let records: Vec<Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_parallel_multiple_files() {
    let records = chunk_json(
        &["--parallel", "-i", &fixture_path("japanese.html")],
        "article.html",
    );

    let sources: Vec<_> = records
        .iter()
        .map(|r| r["source"].as_str().unwrap())
        .collect();
    assert_eq!(
        sources,
        vec!["tests/fixtures/article.html", "tests/fixtures/japanese.html"]
    );
}

#[test]
fn test_glob_pattern() {
    segmark()
        .args(["chunk", "-q", "-i", "tests/fixtures/*.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("article.html"))
        .stdout(predicate::str::contains("japanese.html"));
}

#[test]
fn test_config_file_and_flag_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("segmark.toml");
    fs::write(
        &config_path,
        "[chunking]\nmax_chars = 20\n\n[output]\nformat = \"json\"\npretty_json = false\n",
    )
    .unwrap();

    // Config selects compact JSON
    segmark()
        .args(["chunk", "-q", "-i"])
        .arg(fixture_path("japanese.html"))
        .arg("-c")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[{\"source\""));

    // The format flag wins over the file
    segmark()
        .args(["chunk", "-q", "-f", "text", "-i"])
        .arg(fixture_path("japanese.html"))
        .arg("-c")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("--- "));
}

#[test]
fn test_nonexistent_file() {
    segmark()
        .args(["chunk", "-i", "nonexistent-file.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_zero_max_chars_is_rejected() {
    segmark()
        .args(["chunk", "--max-chars", "0", "-i"])
        .arg(fixture_path("article.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_chars must be greater than 0"));
}

#[test]
fn test_extract_command() {
    segmark()
        .arg("extract")
        .arg("-i")
        .arg(fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Release notes"))
        .stdout(predicate::str::contains("Faster indexing."))
        .stdout(predicate::str::contains("few days\u{2026}"))
        .stdout(predicate::str::contains("<p>").not());
}

#[test]
fn test_extract_ignores_chunking_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("segmark.toml");
    fs::write(&config_path, "[chunking]\nmax_chars = 0\n").unwrap();

    segmark()
        .env("SEGMARK_CONFIG", &config_path)
        .arg("extract")
        .arg("-i")
        .arg(fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Faster indexing."));

    segmark()
        .env("SEGMARK_CONFIG", &config_path)
        .arg("chunk")
        .arg("-i")
        .arg(fixture_path("article.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_chars must be greater than 0"));
}

#[test]
fn test_validate_rules() {
    segmark()
        .args(["validate", "--rules"])
        .arg(fixture_path("rules.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules are valid"))
        .stdout(predicate::str::contains("Terminators: 4"));

    segmark()
        .args(["validate", "--rules"])
        .arg(fixture_path("bad-rules.toml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Rules are invalid"));
}

#[test]
fn test_generate_config_then_use_it() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("segmark.toml");

    segmark()
        .arg("generate-config")
        .arg("-o")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated successfully"));

    segmark()
        .args(["chunk", "-q", "-i"])
        .arg(fixture_path("article.html"))
        .arg("-c")
        .arg(&config_path)
        .assert()
        .success();
}

#[test]
fn test_list_formats() {
    segmark()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("markdown"));
}

#[test]
fn test_help_lists_commands() {
    segmark()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chunk"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("validate"));
}
