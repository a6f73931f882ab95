//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data dir.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitloop-cli"))
        .args(args)
        .env("HABITLOOP_DATA_DIR", dir.path())
        .env_remove("HABITLOOP_INSIGHTS_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(dir: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn list_json(dir: &TempDir) -> Vec<serde_json::Value> {
    let stdout = run_ok(dir, &["habit", "list", "--json"]);
    serde_json::from_str(&stdout).expect("habit list --json should print a JSON array")
}

#[test]
fn test_first_run_lists_default_habits() {
    let dir = TempDir::new().unwrap();
    let habits = list_json(&dir);
    let names: Vec<_> = habits.iter().map(|h| h["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Drink Water", "Morning Meditation", "No Late-Night Snacks"]
    );
    assert!(dir.path().join("habitloop.db").exists());
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_free_tier_limit_blocks_fourth_habit() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["habit", "add", "Journal"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("limited to 3 habits"));

    run_ok(&dir, &["premium", "enable"]);
    let stdout = run_ok(&dir, &["habit", "add", "Journal", "--kind", "build"]);
    assert!(stdout.contains("Habit created:"));
    assert_eq!(list_json(&dir).len(), 4);

    let stdout = run_ok(&dir, &["premium", "status"]);
    assert!(stdout.contains("premium"));
}

#[test]
fn test_toggle_and_adjust_update_streaks() {
    let dir = TempDir::new().unwrap();
    let habits = list_json(&dir);
    let meditation = habits[1]["id"].as_str().unwrap().to_string();
    let water = habits[0]["id"].as_str().unwrap().to_string();

    let stdout = run_ok(&dir, &["habit", "toggle", &meditation[..8]]);
    assert!(stdout.contains("streak 1"));

    run_ok(&dir, &["habit", "adjust", &water, "8"]);
    run_ok(&dir, &["habit", "adjust", &water, "-1"]);

    let habits = list_json(&dir);
    assert_eq!(habits[1]["streak"], 1);
    assert_eq!(habits[1]["completedToday"], true);
    assert_eq!(habits[0]["quantity"]["currentValue"], 7);
    assert_eq!(habits[0]["completedToday"], false);
    assert_eq!(habits[0]["longestStreak"], 1);
}

#[test]
fn test_record_failure_and_remove() {
    let dir = TempDir::new().unwrap();
    let id = list_json(&dir)[2]["id"].as_str().unwrap().to_string();

    run_ok(&dir, &["habit", "record", &id, "success"]);
    run_ok(&dir, &["habit", "record", &id, "failure"]);
    let habits = list_json(&dir);
    assert_eq!(habits[2]["streak"], 0);
    assert_eq!(habits[2]["longestStreak"], 1);

    let stdout = run_ok(&dir, &["habit", "remove", &id]);
    assert!(stdout.contains("Habit removed"));
    assert_eq!(list_json(&dir).len(), 2);
}

#[test]
fn test_private_habit_is_masked() {
    let dir = TempDir::new().unwrap();
    run_ok(&dir, &["premium", "enable"]);
    run_ok(&dir, &["habit", "add", "Therapy homework", "--private"]);

    let habits = list_json(&dir);
    let private = habits.iter().find(|h| h["isPrivate"] == true).unwrap();
    assert_eq!(private["name"], "Private habit");
    assert_eq!(private["masked"], true);
}

#[test]
fn test_unknown_id_is_an_error() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["habit", "toggle", "does-not-exist"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no habit matches"));
}

#[test]
fn test_privacy_status_starts_locked() {
    let dir = TempDir::new().unwrap();
    let stdout = run_ok(&dir, &["privacy", "status", "--json"]);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["state"], "locked");
    assert_eq!(status["failed_attempts"], 0);
    assert_eq!(status["attempts_remaining"], 4);
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_ok(&dir, &["config", "get", "habits.free_tier_limit"]).trim(), "3");
    run_ok(&dir, &["config", "set", "habits.free_tier_limit", "5"]);
    assert_eq!(run_ok(&dir, &["config", "get", "habits.free_tier_limit"]).trim(), "5");

    run_ok(&dir, &["habit", "add", "Journal"]);
    run_ok(&dir, &["habit", "add", "Stretch"]);
    assert_eq!(list_json(&dir).len(), 5);

    let (_, _, code) = run_cli(&dir, &["config", "get", "nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_offline_insights_fall_back() {
    let dir = TempDir::new().unwrap();
    run_ok(&dir, &["config", "set", "insights.enabled", "false"]);
    let stdout = run_ok(&dir, &["insights", "show", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["source"], "fallback");
    assert_eq!(report["insights"].as_array().unwrap().len(), 3);

    let stdout = run_ok(&dir, &["insights", "roast"]);
    assert!(!stdout.trim().is_empty());
}
