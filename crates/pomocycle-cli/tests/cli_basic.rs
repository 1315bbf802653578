//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points POMOCYCLE_HOME at its own temporary directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::time::Duration;

fn split_output(output: Output) -> (String, String, i32) {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "pomocycle-cli", "--"])
        .args(args)
        .env("POMOCYCLE_HOME", home)
        .env_remove("POMOCYCLE_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    split_output(output)
}

/// Run a CLI command with `input` piped to stdin, then closed.
///
/// Panics if the process is still running after `limit`.
fn run_cli_with_input(
    home: &Path,
    args: &[&str],
    input: &str,
    limit: Duration,
) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "pomocycle-cli", "--"])
        .args(args)
        .env("POMOCYCLE_HOME", home)
        .env_remove("POMOCYCLE_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");

    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin.write_all(input.as_bytes()).unwrap();
    drop(stdin);

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });
    let output = rx
        .recv_timeout(limit)
        .expect("CLI did not exit after stdin closed")
        .expect("Failed to wait on CLI command");

    split_output(output)
}

#[test]
fn test_settings_list_defaults() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["settings", "list"]);
    assert_eq!(code, 0, "Settings list failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["workMinutes"], 25);
    assert_eq!(json["breakMinutes"], 5);
    assert_eq!(json["cycles"], 3);
}

#[test]
fn test_settings_set_clamps() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["settings", "set", "workMinutes", "500"]);
    assert_eq!(code, 0, "Settings set failed");
    let (stdout, _, code) = run_cli(home.path(), &["settings", "get", "workMinutes"]);
    assert_eq!(code, 0, "Settings get failed");
    assert_eq!(stdout.trim(), "120");
}

#[test]
fn test_settings_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["settings", "set", "theme", "dark"]);
    assert_ne!(code, 0, "Unknown key unexpectedly accepted");
    assert!(stderr.contains("theme"));
}

#[test]
fn test_settings_reset() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["settings", "set", "cycles", "7"]);
    let (_, _, code) = run_cli(home.path(), &["settings", "reset"]);
    assert_eq!(code, 0, "Settings reset failed");
    let (stdout, _, _) = run_cli(home.path(), &["settings", "get", "cycles"]);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_timer_status() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["settings", "set", "workMinutes", "40"]);
    let (stdout, _, code) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(code, 0, "Timer status failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["type"], "StateSnapshot");
    assert_eq!(json["status"], "idle");
    assert_eq!(json["time_left_seconds"], 2400);
}

#[test]
fn test_timer_run_until_done() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["settings", "set", "workMinutes", "1"]);
    let _ = run_cli(home.path(), &["settings", "set", "cycles", "1"]);
    let (stdout, _, code) = run_cli(
        home.path(),
        &["timer", "run", "--autostart", "--until-done", "--tick-ms", "1", "--no-notify"],
    );
    assert_eq!(code, 0, "Timer run failed");

    let types: Vec<String> = stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["type"].as_str().map(str::to_string))
        .collect();
    assert_eq!(
        types,
        vec!["StateSnapshot", "TimerStarted", "WorkRecorded", "AllCyclesCompleted"]
    );
    assert!(stdout.contains(r#""minutes":1"#));
}

#[test]
fn test_timer_run_until_done_exits_when_paused_at_eof() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["settings", "set", "workMinutes", "1"]);
    let (stdout, _, code) = run_cli_with_input(
        home.path(),
        &["timer", "run", "--until-done", "--tick-ms", "1", "--no-notify"],
        "start\npause\n",
        Duration::from_secs(120),
    );
    assert_eq!(code, 0, "Timer run failed");

    let types: Vec<String> = stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["type"].as_str().map(str::to_string))
        .collect();
    assert_eq!(types.first().map(String::as_str), Some("StateSnapshot"));
    assert!(types.iter().any(|t| t == "TimerStarted"));
    assert_eq!(types.last().map(String::as_str), Some("TimerPaused"));
    assert!(!types.iter().any(|t| t == "AllCyclesCompleted"));
}

#[test]
fn test_captured_logs_have_no_color_codes() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("settings.toml"), "workMinutes = [unterminated").unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["settings", "list"]);
    assert_eq!(code, 0, "Settings list failed");
    assert!(stderr.contains("failed to load settings"), "stderr: {stderr}");
    assert!(!stderr.contains('\u{1b}'), "ANSI escape in captured stderr: {stderr:?}");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["workMinutes"], 25);
}
