//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify exit codes and key output lines.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "flowtimer-cli", "--"])
        .args(args)
        .env("FLOWTIMER_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Extract the id from a "Preset created: <id>" / "Task created: <id>" line.
fn created_id(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|line| line.split_once("created: "))
        .map(|(_, id)| id.trim().to_string())
        .expect("no created id in output")
}

#[test]
fn preset_create_edit_show_delete() {
    let (stdout, _, code) = run_cli(&["preset", "create", "cli-test-preset"]);
    assert_eq!(code, 0, "preset create failed");
    let id = created_id(&stdout);

    let (_, _, code) = run_cli(&["preset", "add-timer", &id, "25"]);
    assert_eq!(code, 0, "add-timer failed");

    let (_, _, code) = run_cli(&["preset", "add-loop", &id, "2"]);
    assert_eq!(code, 0, "add-loop failed");

    let (_, _, code) = run_cli(&["preset", "add-timer", &id, "1", "--at", "1.0"]);
    assert_eq!(code, 0, "nested add-timer failed");

    let (stdout, _, code) = run_cli(&["preset", "show", &id]);
    assert_eq!(code, 0, "preset show failed");
    assert!(stdout.contains("loop x2"));
    // 25 min + 2 * 1 min
    assert!(stdout.contains("Total: 27:00"));

    let (_, _, code) = run_cli(&["preset", "delete", &id]);
    assert_eq!(code, 0, "preset delete failed");
}

#[test]
fn preset_list_succeeds() {
    let (_, _, code) = run_cli(&["preset", "list"]);
    assert_eq!(code, 0, "preset list failed");

    let (stdout, _, code) = run_cli(&["preset", "list", "--json"]);
    assert_eq!(code, 0, "preset list --json failed");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn task_create_list_delete() {
    let (stdout, _, code) = run_cli(&["task", "create", "cli-test-task"]);
    assert_eq!(code, 0, "task create failed");
    let id = created_id(&stdout);

    let (stdout, _, code) = run_cli(&["task", "list", "--json"]);
    assert_eq!(code, 0, "task list failed");
    assert!(stdout.contains(&id));

    let (_, _, code) = run_cli(&["task", "delete", &id]);
    assert_eq!(code, 0, "task delete failed");
}

#[test]
fn timer_lifecycle() {
    // Make the engine idle whatever earlier runs left behind.
    let (_, _, code) = run_cli(&["timer", "stop"]);
    assert_eq!(code, 0, "timer stop failed");

    let (stdout, _, code) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0, "timer status failed");
    assert!(stdout.contains("StateSnapshot"));

    // Reset while idle is a quiet no-op.
    let (stdout, _, code) = run_cli(&["timer", "reset"]);
    assert_eq!(code, 0, "timer reset failed");
    assert!(stdout.contains("already idle"));

    // Start a real preset, pause immediately, then stop.
    let (stdout, _, code) = run_cli(&["preset", "create", "cli-lifecycle-preset"]);
    assert_eq!(code, 0);
    let preset_id = created_id(&stdout);
    let (_, _, code) = run_cli(&["preset", "add-timer", &preset_id, "5"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&["timer", "start", &preset_id]);
    assert_eq!(code, 0, "timer start failed");
    assert!(stdout.contains("TimerStarted"));

    let (stdout, _, code) = run_cli(&["timer", "pause"]);
    assert_eq!(code, 0, "timer pause failed");
    assert!(stdout.contains("TimerPaused"));

    let (stdout, _, code) = run_cli(&["timer", "stop"]);
    assert_eq!(code, 0, "timer stop failed");
    assert!(stdout.contains("TimerStopped"));

    let (_, _, code) = run_cli(&["preset", "delete", &preset_id]);
    assert_eq!(code, 0);

    // No positional preset and (in a fresh dev config) no default_preset.
    let (_, stderr, code) = run_cli(&["timer", "start"]);
    if code != 0 {
        assert!(stderr.contains("error"));
    }
}

#[test]
fn config_get_set_roundtrip() {
    let (stdout, _, code) = run_cli(&["config", "get", "attribution.policy"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.contains("seconds") || stdout.contains("minute_floor"));

    let (_, _, code) = run_cli(&["config", "set", "notifications.sound", "true"]);
    assert_eq!(code, 0, "config set failed");

    let (_, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");

    let (_, _, code) = run_cli(&["config", "get", "no.such.key"]);
    assert_ne!(code, 0, "unknown key should fail");
}

#[test]
fn stats_prints_aggregates() {
    let (stdout, _, code) = run_cli(&["stats"]);
    assert_eq!(code, 0, "stats failed");
    assert!(stdout.contains("total_tracked_secs"));
}
