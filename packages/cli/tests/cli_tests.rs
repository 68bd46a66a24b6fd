//! End-to-end tests for the `adork-playground` binary

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn playground(cwd: &Path, args: &[&str]) -> Output {
    playground_with_stdin(cwd, args, "")
}

fn playground_with_stdin(cwd: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_adork-playground"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_without_engine_prints_initial_content() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.adoc");
    std::fs::write(&doc, "Hello, *AsciiDork!*").unwrap();

    let output = playground(dir.path(), &["render", doc.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("<p>Hello, <strong>Asciidork!</strong></p>"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No conversion engine configured"));
}

#[test]
fn test_raw_output_without_engine_warns() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground(dir.path(), &["render", "--raw-output"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("--raw-output is ignored without --engine or a configured engine"));
}

#[test]
fn test_initial_content_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("adork-playground.config.json"),
        r#"{ "initialContent": "<p>Loading engine</p>" }"#,
    )
    .unwrap();

    let output = playground(dir.path(), &["render", "--json"]);

    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["content"], "<p>Loading engine</p>");
    assert_eq!(state["isError"], false);
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("adork-playground.config.json"), "{ nope").unwrap();

    let output = playground(dir.path(), &["render"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_missing_input_file_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground(dir.path(), &["render", "missing.adoc"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot read missing.adoc"));
}

#[cfg(unix)]
#[test]
fn test_raw_engine_output_is_formatted() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground_with_stdin(
        dir.path(),
        &["render", "--engine", "cat", "--raw-output"],
        "<div class=\"paragraph\"><p>Hello</p></div>",
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "<div class=\"paragraph\">\n  <p>Hello</p>\n</div>\n\n"
    );
}

#[cfg(unix)]
#[test]
fn test_json_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground_with_stdin(
        dir.path(),
        &["render", "--json", "--engine", "cat", "--raw-output"],
        "<p>hi</p>",
    );

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["content"], "<p>hi</p>\n");
    assert_eq!(state["isError"], false);
    assert_eq!(state["kind"], "formatted");
}

#[cfg(unix)]
#[test]
fn test_failing_engine_exits_with_status_two() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground(dir.path(), &["render", "--engine", "false", "--raw-output"]);

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("Conversion failed"));
    assert!(text.contains("conversion engine `false` exited with"));
}

#[cfg(unix)]
#[test]
fn test_formatter_rejection_exits_with_status_two() {
    let dir = tempfile::tempdir().unwrap();

    let output = playground_with_stdin(
        dir.path(),
        &["render", "--engine", "cat", "--raw-output"],
        "<unclosed",
    );

    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("Formatter crashed"));
    assert!(text.contains("unexpected end of input in tag `<unclosed` (1:1)"));
}
