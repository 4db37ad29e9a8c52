//! Integration tests for the `activities` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the expand,
//! conflicts, agenda and status subcommands through the actual binary,
//! including stdin/stdout piping, file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the activities.json fixture.
fn activities_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/activities.json")
}

/// Helper: read the activities.json fixture as a string.
fn activities_json() -> String {
    std::fs::read_to_string(activities_json_path()).expect("activities.json fixture must exist")
}

fn activities() -> Command {
    let mut cmd = Command::cargo_bin("activities").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("ACTIVITIES_TZ")
        .env_remove("ACTIVITIES_LOCALE");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Expand subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn expand_stdin_to_stdout() {
    let output = activities()
        .arg("expand")
        .write_stdin(activities_json())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("stdout must be JSON");
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();

    assert_eq!(
        ids,
        vec![
            "yoga",
            "yoga-1773014400000",
            "yoga-1773619200000",
            "art",
            "talk",
            "outing",
            "outing-1772496000000",
        ]
    );
}

#[test]
fn expand_resets_counts_and_drops_stored_vacancy() {
    let output = activities()
        .args(["expand", "-i", activities_json_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let instance = &value[1];
    assert_eq!(instance["date"], "2026-03-09");
    assert_eq!(instance["signupDeadline"], "2026-03-06");
    assert_eq!(instance["registeredParticipantsCount"], 0);
    assert_eq!(instance["parentActivityId"], "yoga");
    assert!(instance.get("participantVacancy").is_none());
}

#[test]
fn expand_file_to_file() {
    let output_path = std::env::temp_dir().join("activities-test-expand-output.json");
    let _ = std::fs::remove_file(&output_path);

    activities()
        .args(["expand", "-i", activities_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.contains("outing-1772496000000"));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn expand_invalid_json_fails() {
    activities()
        .arg("expand")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse activities"));
}

#[test]
fn expand_missing_file_fails() {
    activities()
        .args(["expand", "-i", "/nonexistent/activities.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Conflicts subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_clash_with_recurring_instance() {
    activities()
        .args([
            "conflicts",
            "-i",
            activities_json_path(),
            "--candidate",
            "art",
            "--registered",
            "talk,yoga-1773014400000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Conflict: yoga-1773014400000 (Chair Yoga) on 2026-03-09 10:00 AM - 11:00 AM",
        ));
}

#[test]
fn conflicts_back_to_back_is_clear() {
    activities()
        .args([
            "conflicts",
            "-i",
            activities_json_path(),
            "--candidate",
            "talk",
            "--registered",
            "yoga",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedule conflict"));
}

#[test]
fn conflicts_with_no_registrations_is_clear() {
    activities()
        .args(["conflicts", "-i", activities_json_path(), "--candidate", "art"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedule conflict"));
}

#[test]
fn conflicts_unknown_id_fails() {
    activities()
        .args([
            "conflicts",
            "-i",
            activities_json_path(),
            "--candidate",
            "pottery",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown activity id: 'pottery'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Agenda subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn agenda_groups_by_day_in_order() {
    let output = activities()
        .args(["agenda", "-i", activities_json_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    let headings: Vec<&str> = text.lines().filter(|l| !l.starts_with(' ')).collect();
    assert_eq!(
        headings,
        vec![
            "Sat, Jan 31, 2026",
            "Mon, Mar 2, 2026",
            "Tue, Mar 3, 2026",
            "Mon, Mar 9, 2026",
            "Mon, Mar 16, 2026",
        ]
    );
    assert!(text.contains("Mon, Mar 2, 2026\n  10:00 AM - 11:00 AM  Chair Yoga (yoga) @ Activity Room A\n  11:00 AM - 12:00 PM  Health Talk (talk)\n"));
}

#[test]
fn agenda_in_chinese() {
    activities()
        .args(["agenda", "-i", activities_json_path(), "--locale", "zh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026年3月2日 星期一"))
        .stdout(predicate::str::contains("椅子瑜伽 (yoga)"))
        .stdout(predicate::str::contains("Health Talk (talk)"));
}

#[test]
fn agenda_locale_from_env() {
    activities()
        .env("ACTIVITIES_LOCALE", "zh")
        .args(["agenda", "-i", activities_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026年1月31日 星期六"));
}

#[test]
fn agenda_unknown_locale_fails() {
    activities()
        .args(["agenda", "-i", activities_json_path(), "--locale", "fr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown locale: 'fr'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Status subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn status_for_participant() {
    let output = activities()
        .args([
            "status",
            "-i",
            activities_json_path(),
            "--today",
            "2026-03-01",
            "--signed-up",
            "yoga",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    let rows: Vec<(&str, &str)> = text
        .lines()
        .map(|line| {
            let (status, rest) = line.split_once("  ").unwrap();
            let id = rest.rsplit_once(" (").unwrap().1.trim_end_matches(')');
            (status.trim(), id)
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            ("CLOSED", "outing"),
            ("SIGNED UP", "yoga"),
            ("CLOSED", "talk"),
            ("CLOSED", "outing-1772496000000"),
            ("OPEN", "yoga-1773014400000"),
            ("FULL", "art"),
            ("OPEN", "yoga-1773619200000"),
        ]
    );
}

#[test]
fn status_for_volunteer_uses_volunteer_capacity() {
    activities()
        .args([
            "status",
            "-i",
            activities_json_path(),
            "--role",
            "volunteer",
            "--today",
            "2026-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("FULL       2026-01-31"))
        .stdout(predicate::str::contains("OPEN       2026-03-09  10:30 AM - 12:00 PM  Art Jamming (art)"));
}

#[test]
fn status_with_timezone_runs() {
    activities()
        .args([
            "status",
            "-i",
            activities_json_path(),
            "--timezone",
            "Asia/Hong_Kong",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(yoga)"));
}

#[test]
fn status_unknown_timezone_fails() {
    activities()
        .args([
            "status",
            "-i",
            activities_json_path(),
            "--timezone",
            "Atlantis/Central",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}

#[test]
fn status_bad_today_fails() {
    activities()
        .args(["status", "-i", activities_json_path(), "--today", "01/03/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --today date"))
        .stderr(predicate::str::contains("Invalid date: 01/03/2026"));
}

#[test]
fn status_unknown_role_fails() {
    activities()
        .args([
            "status",
            "-i",
            activities_json_path(),
            "--role",
            "staff",
            "--today",
            "2026-03-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid role: staff"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    activities()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("expand"))
        .stdout(predicate::str::contains("conflicts"))
        .stdout(predicate::str::contains("agenda"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn missing_subcommand_fails() {
    activities().assert().failure();
}

#[test]
fn verbose_logs_to_stderr_only() {
    activities()
        .args(["-v", "expand", "-i", activities_json_path()])
        .assert()
        .success()
        .stderr(predicate::str::contains("expanded recurring activity"))
        .stdout(predicate::str::contains("expanded recurring activity").not());
}
