//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "simplytime-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn run_emits_started_event_and_final_snapshot() {
    let (stdout, _stderr, code) = run_cli(&[
        "run",
        "--skip-lead-in",
        "--work-minutes",
        "52",
        "--break-minutes",
        "17",
        "--seconds",
        "2",
    ]);
    assert_eq!(code, 0);

    let mut lines = stdout.lines().filter(|l| !l.trim().is_empty());
    let first: serde_json::Value =
        serde_json::from_str(lines.next().expect("no output")).expect("not JSON");
    assert_eq!(first["type"], "SessionReset");

    // The run ends with a pretty-printed snapshot: the only line that is
    // a bare opening brace.
    let brace = stdout.find("\n{\n").expect("no final snapshot") + 1;
    let snapshot: serde_json::Value = serde_json::from_str(&stdout[brace..]).expect("bad snapshot");
    assert_eq!(snapshot["mode"], "work");
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["work_minutes"], 52);
}

#[test]
fn run_rejects_unknown_flags() {
    let (_stdout, _stderr, code) = run_cli(&["run", "--no-such-flag"]);
    assert_ne!(code, 0);
}

#[test]
fn breathe_zero_breaths_exits_immediately() {
    let (stdout, _stderr, code) = run_cli(&["breathe", "--breaths", "0"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Breathe In"));
    assert!(stdout.contains("done: 0 breaths"));
}
