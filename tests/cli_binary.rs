#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{PERFECT_REPORT, SAMPLE_REPORT, recorded_args, write_fake_tessl, write_reporting_tessl};

/// Command running in `dir` so no stray `.skill-health.toml` is picked up.
#[allow(deprecated)]
fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skill-health").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn write_report(dir: &Path, report: &str) -> String {
    let path = dir.join("report.log");
    fs::write(&path, report).unwrap();
    path.display().to_string()
}

// --- Help & version ---

#[test]
fn help_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn version_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skill-health"));
}

#[test]
fn missing_subcommand_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path()).assert().failure();
}

// --- parse ---

#[test]
fn parse_file_renders_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), SAMPLE_REPORT);
    cmd(dir.path())
        .args(["parse", &report, "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Average Score: 84%"))
        .stdout(predicate::str::contains(
            "Validation: PASSED (0 errors, 1 warnings)",
        ))
        .stdout(predicate::str::contains("  Content 67%"))
        .stdout(predicate::str::contains(
            "    actionability 1/3  Mostly pseudocode rather than runnable commands",
        ));
}

#[test]
fn parse_stdin_strips_ansi() {
    let dir = tempfile::TempDir::new().unwrap();
    let colored = SAMPLE_REPORT.replace("✔", "\x1b[32m✔\x1b[0m");
    cmd(dir.path())
        .args(["parse", "-", "--json"])
        .write_stdin(colored)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"skill_md_line_count\""));
}

#[test]
fn parse_json_envelope() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), SAMPLE_REPORT);
    let output = cmd(dir.path())
        .args(["parse", &report, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["averageScore"], 84);
    assert_eq!(json["data"]["validationSummary"]["warnings"], 1);
    assert_eq!(json["data"]["validationSummary"]["passed"], true);
    assert_eq!(json["data"]["judgeCategories"][1]["criteria"][1]["maxScore"], 3);
    assert!(json.get("error").is_none());
}

#[test]
fn parse_improve_prints_prompt() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), SAMPLE_REPORT);
    cmd(dir.path())
        .args(["parse", &report, "--improve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Areas to Improve"))
        .stdout(predicate::str::contains(
            "1. **Content > actionability** (1/3):",
        ))
        .stdout(predicate::str::contains(
            "2. **Content > conciseness** (2/3):",
        ));
}

#[test]
fn parse_improve_with_override_template() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), SAMPLE_REPORT);
    let prompts = dir.path().join("prompts");
    fs::create_dir(&prompts).unwrap();
    fs::write(
        prompts.join("improve-skill.md"),
        "Fix {{ weak_area_count }} areas (now {{ average_score }}%)\n",
    )
    .unwrap();

    cmd(dir.path())
        .args(["parse", &report, "--improve", "--prompt-dir"])
        .arg(&prompts)
        .assert()
        .success()
        .stdout("Fix 2 areas (now 84%)\n");
}

#[test]
fn parse_improve_perfect_report() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), PERFECT_REPORT);
    cmd(dir.path())
        .args(["parse", &report, "--improve"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Score is already 100%"));
}

#[test]
fn parse_improve_suppressed_at_perfect_average() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(
        dir.path(),
        &SAMPLE_REPORT.replace("Average Score: 84%", "Average Score: 100%"),
    );
    cmd(dir.path())
        .args(["parse", &report, "--improve"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("nothing to improve"));
}

#[test]
fn parse_improve_without_weak_areas() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(
        dir.path(),
        &PERFECT_REPORT.replace("Average Score: 100%", "Average Score: 95%"),
    );
    cmd(dir.path())
        .args(["parse", &report, "--improve"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No weak areas found"));
}

#[test]
fn parse_render_lists_weak_areas() {
    let dir = tempfile::TempDir::new().unwrap();
    let report = write_report(dir.path(), SAMPLE_REPORT);
    cmd(dir.path())
        .args(["parse", &report, "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "To improve (2 areas)\n  ● Content > actionability (1/3)\n  ● Content > conciseness (2/3)\n",
        ))
        .stdout(predicate::str::contains("How to improve:"));
}

#[test]
fn parse_json_and_improve_conflict() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .args(["parse", "-", "--json", "--improve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn parse_missing_file_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .args(["parse", "does-not-exist.log"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

// --- review ---

#[test]
fn review_invalid_url_json_is_validation_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = cmd(dir.path())
        .args(["review", "https://gitlab.com/a/b", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["type"], "validation");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Must be a GitHub URL")
    );
}

#[test]
fn review_invalid_skill_exits_2() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .args(["review", "github:a/b", "--skill", "bad skill", "--no-color"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn review_records_history() {
    let dir = tempfile::TempDir::new().unwrap();
    let tessl = write_reporting_tessl(dir.path(), SAMPLE_REPORT);
    let history = dir.path().join("history");

    cmd(dir.path())
        .args(["review", "github:tobi/qmd", "--skill", "qmd", "--no-color"])
        .arg("--tessl-binary")
        .arg(&tessl)
        .arg("--history-dir")
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("Average Score: 84%"));

    assert_eq!(
        recorded_args(dir.path()),
        "skill review github:tobi/qmd --skill qmd"
    );
    assert!(history.join("history.toml").exists());

    cmd(dir.path())
        .args(["history", "--no-color"])
        .arg("--history-dir")
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("github:tobi/qmd  84%"));
}

#[test]
fn review_multiple_skills_lists_choices() {
    let dir = tempfile::TempDir::new().unwrap();
    let tessl = write_fake_tessl(
        dir.path(),
        "echo 'Available skills: alpha, beta'\nexit 1",
    );

    cmd(dir.path())
        .args(["review", "github:org/skills", "--no-color"])
        .arg("--tessl-binary")
        .arg(&tessl)
        .arg("--history-dir")
        .arg(dir.path().join("history"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "This repository contains multiple skills.",
        ))
        .stderr(predicate::str::contains("Available skills: alpha, beta"));

    assert!(!dir.path().join("history").join("history.toml").exists());
}

#[test]
fn review_not_found_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let tessl = write_fake_tessl(dir.path(), "echo 'skill does not exist' >&2\nexit 1");

    let output = cmd(dir.path())
        .args(["review", "github:a/b", "--json"])
        .arg("--tessl-binary")
        .arg(&tessl)
        .arg("--history-dir")
        .arg(dir.path().join("history"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["type"], "not_found");
    assert_eq!(json["error"]["message"], "Repository or skill not found");
}

#[test]
fn review_timeout_from_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let tessl = write_fake_tessl(dir.path(), "sleep 30");
    fs::write(
        dir.path().join(".skill-health.toml"),
        format!(
            "tessl_binary = \"{}\"\ntimeout_secs = 1\nhistory_dir = \"{}\"\n",
            tessl.display(),
            dir.path().join("history").display()
        ),
    )
    .unwrap();

    let output = cmd(dir.path())
        .args(["review", "github:a/b", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["type"], "timeout");
    assert_eq!(json["error"]["message"], "Review timed out after 1 seconds");
}

// --- history & config ---

#[test]
fn history_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .arg("history")
        .arg("--history-dir")
        .arg(dir.path().join("none"))
        .assert()
        .success()
        .stdout("No recent reviews.\n");
}

#[test]
fn explicit_missing_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    cmd(dir.path())
        .args(["history", "--config", "missing.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join(".skill-health.toml"), "history_limit = 0\n").unwrap();
    cmd(dir.path())
        .arg("history")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("history_limit must be > 0"));
}
