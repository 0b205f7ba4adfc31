//! Output validation tests for stratos-stats
//!
//! These tests check the shape of everything the binary prints: summary
//! lines, console log lines, JSON log entries and the verbose report.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper function to create a test command running inside `dir`
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stratos-stats").unwrap();
    cmd.current_dir(dir.path());
    for var in ["STATS_INPUT_ROOT", "STATS_OUTPUT_FILE", "STATS_MANIFEST", "ENABLE_COLOR", "LOG_FORMAT"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Validation patterns for different output formats
struct OutputPatterns {
    /// Five pipe-separated values with four decimals
    pub summary_line: Regex,
    /// Console log line: timestamp, level, logger name
    pub console_log_line: Regex,
    /// Report cell: mean ± confidence half-width
    pub report_series: Regex,
}

impl Default for OutputPatterns {
    fn default() -> Self {
        Self {
            summary_line: Regex::new(r"^-?\d+\.\d{4}(\|-?\d+\.\d{4}){4}$").unwrap(),
            console_log_line: Regex::new(
                r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}\s+(TRACE|DEBUG|INFO|WARN|ERROR|FATAL) \[[A-Z]+\] ",
            ).unwrap(),
            report_series: Regex::new(r"\d+\.\d{2} ± \d+\.\d{2}").unwrap(),
        }
    }
}

/// Twelve runs with uneven values, one requester without data in most runs
/// and one run where nobody received anything
fn noisy_results() -> String {
    let mut text = String::new();
    for run in 0..12usize {
        if run == 7 {
            text.push_str("-1|0|1|0\n-1|0|0|0\n-1|0|1|0\n-1|0|0|0\n0\n");
            continue;
        }
        let mut packets = 0;
        for requester in 0..4usize {
            if (run * 3 + requester) % 5 == 0 {
                text.push_str("-1|0|1|0\n");
                continue;
            }
            let received = 6 + (run + requester) % 5;
            packets += received;
            text.push_str(&format!(
                "{}|{}|1|{}\n",
                50 + (run * 17 + requester * 11) % 90,
                u8::from((run + requester) % 3 != 0),
                received
            ));
        }
        text.push_str(&format!("{}\n", packets * 256 + run * 31));
    }
    text
}

fn manifest_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), noisy_results()).unwrap();
    }
    fs::write(
        dir.path().join("batch.json"),
        r#"{"groups":[
            {"name":"alpha","inputs":[{"file":"a.txt"},{"file":"b.txt"}]},
            {"name":"beta","inputs":[{"file":"c.txt"}]}
        ]}"#,
    ).unwrap();
    dir
}

#[test]
fn test_summary_line_format() {
    let patterns = OutputPatterns::default();
    let dir = manifest_dir();

    create_test_cmd(&dir)
        .args(["--manifest", "batch.json", "--no-color"])
        .assert()
        .success();

    let summary = fs::read_to_string(dir.path().join("centralized_statics.txt")).unwrap();
    for line in summary.lines().filter(|l| !l.is_empty()) {
        assert!(patterns.summary_line.is_match(line), "bad summary line: {:?}", line);
    }
    assert_eq!(summary.lines().filter(|l| l.is_empty()).count(), 1);
}

#[test]
fn test_percentages_are_bounded() {
    let dir = manifest_dir();

    let output = create_test_cmd(&dir)
        .args(["--file", "a.txt", "--no-color"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let means: Vec<f64> = stdout.lines().nth(1).unwrap()
        .split('|')
        .map(|v| v.parse().unwrap())
        .collect();

    assert_eq!(means.len(), 5);
    for pct in &means[1..4] {
        assert!((0.0..=100.0).contains(pct), "percentage out of range: {}", pct);
    }
    assert!(means[4] > 1.0);
}

#[test]
fn test_single_file_output_is_exactly_two_summary_lines() {
    let patterns = OutputPatterns::default();
    let dir = manifest_dir();

    let output = create_test_cmd(&dir)
        .args(["--file", "b.txt", "--verbose", "--no-color"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| patterns.summary_line.is_match(l)));
}

#[test]
fn test_console_log_format() {
    let patterns = OutputPatterns::default();
    let dir = manifest_dir();

    let output = create_test_cmd(&dir)
        .args(["--manifest", "batch.json", "--verbose", "--no-color"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let log_lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert!(!log_lines.is_empty());
    for line in log_lines {
        assert!(patterns.console_log_line.is_match(line), "bad log line: {:?}", line);
    }
    assert!(stderr.contains("[BATCH]"));
}

#[test]
fn test_json_log_fields() {
    let dir = manifest_dir();

    let output = create_test_cmd(&dir)
        .args(["--manifest", "batch.json", "--debug", "--log-format", "json", "--no-color"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let entries: Vec<Value> = stderr
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let file_entries: Vec<&Value> = entries.iter()
        .filter(|e| e["fields"]["runs"].is_number())
        .collect();
    assert_eq!(file_entries.len(), 3);
    for entry in file_entries {
        assert_eq!(entry["fields"]["runs"], 12);
        assert_eq!(entry["fields"]["runs_with_data"], 11);
    }

    // one session id shared by every entry that carries one
    let sessions: Vec<&str> = entries.iter()
        .filter_map(|e| e["fields"]["session_id"].as_str())
        .collect();
    assert!(!sessions.is_empty());
    assert!(sessions.iter().all(|s| *s == sessions[0]));
}

#[test]
fn test_verbose_report_format() {
    let patterns = OutputPatterns::default();
    let dir = manifest_dir();

    let output = create_test_cmd(&dir)
        .args(["--manifest", "batch.json", "--verbose", "--no-color"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("alpha"));
    assert!(stdout.contains("beta"));
    assert!(patterns.report_series.is_match(&stdout));
    assert!(!stdout.contains("\x1b["), "plain report must not contain ANSI codes");
}

#[test]
fn test_error_output_format() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--file", "missing.txt", "--no-color"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_match(r"\[IO\] .*missing\.txt").unwrap())
        .stderr(predicate::str::contains("\x1b[").not());
}
