use predicates::prelude::*;
use serde_json::{json, Value};
use std::error::Error;
use std::fs;

const STREAM: &str = "event: delta_encoding\n\
data: \"v1\"\n\
\n\
event: delta\n\
data: {\"p\": \"/message/content\", \"o\": \"add\", \"v\": \"Hel\"}\n\
\n\
event: delta\n\
data: {\"p\": \"/message/content\", \"o\": \"append\", \"v\": \"lo ✓\"}\n\
\n\
event: delta\n\
data: {broken\n\
\n\
data: [DONE]\n\
\n";

#[test]
fn converts_stdin_to_pretty_json() -> Result<(), Box<dyn Error>> {
    let output = assert_cmd::Command::cargo_bin("sse-delta")?
        .write_stdin(STREAM)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"message\": {"))
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&output)?;
    assert_eq!(doc, json!({"message": {"content": "Hello ✓"}}));
    Ok(())
}

#[test]
fn reads_file_and_prints_compact() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("stream.sse");
    fs::write(&input, STREAM)?;

    assert_cmd::Command::cargo_bin("sse-delta")?
        .arg(&input)
        .arg("--compact")
        .assert()
        .success()
        .stdout("{\"message\":{\"content\":\"Hello ✓\"}}\n");
    Ok(())
}

#[test]
fn pointer_selects_subtree() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("sse-delta")?
        .args(["--pointer", "/message/content"])
        .write_stdin(STREAM)
        .assert()
        .success()
        .stdout("\"Hello ✓\"\n");

    assert_cmd::Command::cargo_bin("sse-delta")?
        .args(["--pointer", "/missing"])
        .write_stdin(STREAM)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn strict_mode_fails_on_malformed_event() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("sse-delta")?
        .arg("--strict")
        .write_stdin(STREAM)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn stats_go_to_stderr() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("sse-delta")?
        .arg("--stats")
        .write_stdin(STREAM)
        .assert()
        .success()
        .stderr(predicate::str::contains("applied: 2"))
        .stderr(predicate::str::contains("skipped: 0"));
    Ok(())
}

#[test]
fn missing_file_is_an_error() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("sse-delta")?
        .arg("does/not/exist.sse")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn invalid_utf8_line_does_not_abort() -> Result<(), Box<dyn Error>> {
    let mut input = b"event: delta\ndata: {\"p\": \"/a\", \"o\": \"add\", \"v\": \"\xff\"}\n\n".to_vec();
    input.extend_from_slice(b"event: delta\ndata: {\"p\": \"/b\", \"o\": \"add\", \"v\": 2}\n\n");

    let output = assert_cmd::Command::cargo_bin("sse-delta")?
        .arg("--compact")
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: Value = serde_json::from_slice(&output)?;
    assert_eq!(doc, json!({"a": "\u{fffd}", "b": 2}));
    Ok(())
}
