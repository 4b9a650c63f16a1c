use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const AB_PAYLOAD: &str = r#"{
    "total_minutes": 35,
    "tasks": [
        {"id": 1, "name": "A", "minutes": 25, "priority": "S", "focus": 8, "method": "Pomodoro"},
        {"id": 2, "name": "B", "minutes": 10, "priority": "B", "focus": 5}
    ],
    "motivation": "Every second counts.",
    "tips": "Phone in another room."
}"#;

/// Temporary database, session and settings files for one test.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temporary directory"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Command with --no-color and every file pointed into the temp dir.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.arg("--no-color")
            .arg("--database-file")
            .arg(self.path("cli_test.db"))
            .arg("--session-file")
            .arg(self.path("session.json"))
            .arg("--settings-file")
            .arg(self.path("settings.json"));
        cmd
    }

    fn write_payload(&self, name: &str, payload: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, payload).expect("Failed to write payload");
        path
    }

    fn import_ab(&self) {
        let payload = self.write_payload("plan.json", AB_PAYLOAD);
        self.cmd()
            .args(["plan", "import"])
            .arg(&payload)
            .assert()
            .success();
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_cli_help_output() {
    Command::cargo_bin("cadence")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_cli_version_output() {
    Command::cargo_bin("cadence")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cadence"));
}

#[test]
fn test_cli_list_empty_plans() {
    let env = TestEnv::new();
    env.cmd()
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_default_command_lists_plans() {
    let env = TestEnv::new();
    env.import_ab();
    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("# Recent Plans"))
        .stdout(predicate::str::contains("(ID: 1) (0/2)"));
}

#[test]
fn test_cli_import_plan() {
    let env = TestEnv::new();
    let payload = env.write_payload("plan.json", AB_PAYLOAD);

    env.cmd()
        .args(["plan", "import", arg(&payload), "--title", "Morning"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported plan with ID: 1"))
        .stdout(predicate::str::contains("# 1. Morning"))
        .stdout(predicate::str::contains("Every second counts."))
        .stdout(predicate::str::contains("Method: Pomodoro"));

    env.cmd()
        .args(["plan", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# 1. Morning"));
}

#[test]
fn test_cli_import_fenced_payload_from_stdin() {
    let env = TestEnv::new();
    env.cmd()
        .args(["plan", "import", "-"])
        .write_stdin(format!("```json\n{AB_PAYLOAD}\n```\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported plan with ID: 1"));
}

#[test]
fn test_cli_import_malformed_payload() {
    let env = TestEnv::new();
    let payload = env.write_payload("broken.json", "Sorry, I cannot help with that.");

    env.cmd()
        .args(["plan", "import", arg(&payload)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed plan payload"))
        .stderr(predicate::str::contains("Sorry, I cannot help with that."));

    env.cmd()
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_import_payload_without_tasks() {
    let env = TestEnv::new();
    let payload = env.write_payload("empty.json", r#"{"total_minutes": 30}"#);

    env.cmd()
        .args(["plan", "import", arg(&payload)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plan"));

    env.cmd()
        .args(["plan", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_run_plan_to_completion() {
    let env = TestEnv::new();
    env.import_ab();

    env.cmd()
        .args(["run", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1/2: A"))
        .stdout(predicate::str::contains("Up next"));

    env.cmd()
        .args(["run", "done", "--actual", "20", "--focus", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded **A**: 20 of 25 min, focus 8."))
        .stdout(predicate::str::contains("Task 2/2: B"));

    env.cmd()
        .args(["run", "done", "--actual", "12", "--focus", "5", "--notes", "tired"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded **B**: 12 of 10 min, focus 5."))
        .stdout(predicate::str::contains("Plan complete."));

    env.cmd()
        .args(["run", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan 1 is finished."));

    env.cmd()
        .args(["plan", "records", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**A**: 20 of 25 min, focus 8"))
        .stdout(predicate::str::contains("> tired"))
        .stdout(predicate::str::contains("2 record(s), 32 min in total"));

    env.cmd()
        .args(["plan", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"));
}

#[test]
fn test_cli_run_without_plan() {
    let env = TestEnv::new();

    env.cmd()
        .args(["run", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan is running."));

    env.cmd()
        .args(["run", "start"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active plan"));

    env.cmd()
        .args(["run", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active plan"));
}

#[test]
fn test_cli_second_start_is_rejected() {
    let env = TestEnv::new();
    env.import_ab();

    env.cmd().args(["run", "start"]).assert().success();
    env.cmd()
        .args(["run", "start"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already running"));
}

#[test]
fn test_cli_stop_and_resume() {
    let env = TestEnv::new();
    env.import_ab();

    env.cmd().args(["run", "start"]).assert().success();
    env.cmd()
        .args(["run", "done", "--actual", "20"])
        .assert()
        .success();
    env.cmd()
        .args(["run", "stop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped plan 1"));

    env.cmd()
        .args(["run", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan is running."));

    env.cmd()
        .args(["run", "resume"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 2/2: B"));
}

#[test]
fn test_cli_back_does_not_duplicate_records() {
    let env = TestEnv::new();
    env.import_ab();

    env.cmd().args(["run", "start"]).assert().success();
    env.cmd()
        .args(["run", "done", "--actual", "20"])
        .assert()
        .success();
    env.cmd()
        .args(["run", "back"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1/2: A"))
        .stdout(predicate::str::contains("Already recorded"));
    env.cmd()
        .args(["run", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already recorded"));

    env.cmd()
        .args(["plan", "records", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 record(s)"));
}

#[test]
fn test_cli_abandon() {
    let env = TestEnv::new();
    env.import_ab();

    env.cmd().args(["run", "start"]).assert().success();
    env.cmd()
        .args(["run", "abandon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Abandoned plan 1"));

    env.cmd()
        .args(["plan", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abandoned"));
}

#[test]
fn test_cli_stats_show_and_export() {
    let env = TestEnv::new();
    env.import_ab();
    env.cmd().args(["run", "start"]).assert().success();
    env.cmd()
        .args(["run", "done", "--actual", "20", "--focus", "8"])
        .assert()
        .success();

    env.cmd()
        .args(["stats", "show", "--days", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Date |"))
        .stdout(predicate::str::contains("| 25 | 20 | 8.0 | 1/1 | 100% |"))
        .stdout(predicate::str::contains("Trend over 1 day(s)"));

    let output = env.path("stats.csv");
    env.cmd()
        .args(["stats", "export", "--output", arg(&output)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 day(s)"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert!(text.starts_with("date,scheduled_minutes,actual_minutes,avg_focus_level,completion_rate\n"));
    assert!(text.contains(",25,20,8.00,100.00"));
}

#[test]
fn test_cli_stats_empty_window() {
    let env = TestEnv::new();
    env.cmd()
        .args(["stats", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No task records in this window."));
}

#[test]
fn test_cli_stats_note_and_refresh() {
    let env = TestEnv::new();

    env.cmd()
        .args(["stats", "note", "Slow start", "--date", "2026-03-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Noted 2026-03-14"));

    env.cmd()
        .args(["stats", "note", "Bad date", "--date", "14/03/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));

    env.cmd()
        .args(["stats", "refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refreshed 0 daily log(s)"));
}

#[test]
fn test_cli_config_round_trip() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "get", "model"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not set"));

    env.cmd()
        .args(["config", "set", "model", "deepseek-chat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved model"));

    env.cmd()
        .args(["config", "get", "model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deepseek-chat"));

    env.cmd()
        .args(["config", "set", "api_key", "sk-abcdefghijklmnop"])
        .assert()
        .success();

    env.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- model: deepseek-chat"))
        .stdout(predicate::str::contains("mnop"))
        .stdout(predicate::str::contains("sk-abcdefghijklmnop").not());

    env.cmd()
        .args(["config", "set", "max_attempts", "zero"])
        .assert()
        .failure();
}
