//! End-to-end tests for the stratos-stats binary
//!
//! Each test builds a throwaway results directory and runs the compiled
//! binary against it, checking the summary file, stdout and exit codes.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Built-in manifest layout: (file, packets, requesters)
const BUILTIN_INPUTS: &[(&str, u32, u32)] = &[
    ("centralized_mobile_0.txt", 10, 4),
    ("centralized_mobile_25.txt", 10, 4),
    ("centralized_mobile_50.txt", 10, 4),
    ("centralized_mobile_100.txt", 10, 4),
    ("centralized_requesters_1.txt", 10, 1),
    ("centralized_requesters_2.txt", 10, 2),
    ("centralized_requesters_4.txt", 10, 4),
    ("centralized_requesters_8.txt", 10, 8),
    ("centralized_requesters_16.txt", 10, 16),
    ("centralized_requesters_24.txt", 10, 24),
    ("centralized_requesters_32.txt", 10, 32),
    ("centralized_services_1.txt", 10, 4),
    ("centralized_services_2.txt", 10, 4),
    ("centralized_services_4.txt", 10, 4),
    ("centralized_services_8.txt", 10, 4),
    ("centralized_packets_10.txt", 10, 4),
    ("centralized_packets_20.txt", 20, 4),
    ("centralized_packets_40.txt", 40, 4),
    ("centralized_packets_60.txt", 60, 4),
];

/// Helper function to create a test command isolated from the caller's environment
fn create_test_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stratos-stats").unwrap();
    cmd.current_dir(dir);
    for var in ["STATS_INPUT_ROOT", "STATS_OUTPUT_FILE", "STATS_MANIFEST", "ENABLE_COLOR", "LOG_FORMAT"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Three runs; every requester answers with all packets, success alternates
fn results_file(requesters: u32, packets: u32) -> String {
    let mut text = String::new();
    for run in 0..3u32 {
        for requester in 0..requesters {
            let success = u32::from((requester + run) % 2 == 0);
            text.push_str(&format!("{}|{}|1|{}\n", 10 * (requester + 1) + 5 * run, success, packets));
        }
        text.push_str(&format!("{}\n", requesters * packets * 256));
    }
    text
}

fn create_builtin_layout() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (file, packets, requesters) in BUILTIN_INPUTS {
        fs::write(dir.path().join(file), results_file(*requesters, *packets)).unwrap();
    }
    dir
}

#[test]
fn test_builtin_batch_layout() {
    let dir = create_builtin_layout();

    create_test_cmd(dir.path())
        .arg("--root")
        .arg(dir.path())
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let summary = fs::read_to_string(dir.path().join("centralized_statics.txt")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();

    // 19 files, two lines each, three group separators
    assert_eq!(lines.len(), 41);
    let blanks: Vec<usize> = lines.iter().enumerate().filter(|(_, l)| l.is_empty()).map(|(i, _)| i).collect();
    assert_eq!(blanks, vec![8, 23, 32]);
    assert!(summary.ends_with('\n'));
    assert!(!summary.ends_with("\n\n"));
}

#[test]
fn test_builtin_batch_values() {
    let dir = create_builtin_layout();

    create_test_cmd(dir.path())
        .args(["--root", ".", "--no-color"])
        .assert()
        .success();

    let summary = fs::read_to_string(dir.path().join("centralized_statics.txt")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();

    // mobility_0: four requesters, times 10..40 shifted by 5 per run
    // mean time 30, success 50%, all found, all packets, overhead 1
    assert_eq!(lines[1], "30.0000|50.0000|100.0000|100.0000|1.0000");
    assert_eq!(lines[0], "5.6580|0.0000|0.0000|0.0000|0.0000");

    // requesters_1: one requester, success 100/0/100
    assert_eq!(lines[10], "15.0000|66.6667|100.0000|100.0000|1.0000");
}

#[test]
fn test_single_file_mode_prints_to_stdout() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("run.txt"), results_file(4, 10)).unwrap();

    create_test_cmd(dir.path())
        .args(["--file", "run.txt", "--no-color"])
        .assert()
        .success()
        .stdout("5.6580|0.0000|0.0000|0.0000|0.0000\n30.0000|50.0000|100.0000|100.0000|1.0000\n");

    // single-file mode never writes the summary file
    assert!(!dir.path().join("centralized_statics.txt").exists());
}

#[test]
fn test_single_file_mode_parameters() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("run.txt"), results_file(2, 20)).unwrap();

    create_test_cmd(dir.path())
        .args(["--file", "run.txt", "--requesters", "2", "--packets", "20"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("20.0000|50.0000|100.0000|100.0000|1.0000\n"));
}

#[test]
fn test_custom_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), results_file(4, 10)).unwrap();
    fs::write(dir.path().join("b.txt"), results_file(2, 10)).unwrap();
    fs::write(
        dir.path().join("batch.json"),
        r#"{"groups":[
            {"name":"first","inputs":[{"file":"a.txt"}]},
            {"name":"second","inputs":[{"file":"b.txt","requesters":2}]}
        ]}"#,
    ).unwrap();

    create_test_cmd(dir.path())
        .args(["--manifest", "batch.json", "--output", "out.txt"])
        .assert()
        .success();

    let summary = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2], "");
    assert_eq!(lines[4], "20.0000|50.0000|100.0000|100.0000|1.0000");
}

#[test]
fn test_output_is_truncated_between_runs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), results_file(4, 10)).unwrap();
    fs::write(dir.path().join("batch.json"), r#"{"groups":[{"name":"g","inputs":[{"file":"a.txt"}]}]}"#).unwrap();
    fs::write(dir.path().join("centralized_statics.txt"), "stale\nstale\nstale\nstale\n").unwrap();

    create_test_cmd(dir.path())
        .args(["--manifest", "batch.json"])
        .assert()
        .success();

    let summary = fs::read_to_string(dir.path().join("centralized_statics.txt")).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert!(!summary.contains("stale"));
}

#[test]
fn test_print_manifest() {
    let dir = TempDir::new().unwrap();

    let output = create_test_cmd(dir.path())
        .arg("--print-manifest")
        .output()
        .unwrap();
    assert!(output.status.success());

    let manifest: Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = manifest["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 4);
    assert_eq!(groups[0]["name"], "mobility");
    assert_eq!(groups[1]["inputs"][6]["requesters"], 32);
    assert_eq!(groups[3]["inputs"][3]["packets"], 60);

    let total: usize = groups.iter().map(|g| g["inputs"].as_array().unwrap().len()).sum();
    assert_eq!(total, 19);
}

#[test]
fn test_environment_configuration() {
    let dir = create_builtin_layout();
    fs::create_dir(dir.path().join("reports")).unwrap();

    create_test_cmd(dir.path())
        .env("STATS_OUTPUT_FILE", "reports/summary.txt")
        .assert()
        .success();

    assert!(dir.path().join("reports/summary.txt").exists());
    assert!(!dir.path().join("centralized_statics.txt").exists());
}

#[test]
fn test_dotenv_file_is_read_from_working_directory() {
    let dir = create_builtin_layout();
    fs::write(dir.path().join(".env"), "STATS_OUTPUT_FILE=from_dotenv.txt\n").unwrap();

    create_test_cmd(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("from_dotenv.txt").exists());

    // the command line wins over .env
    create_test_cmd(dir.path())
        .args(["--output", "from_cli.txt"])
        .assert()
        .success();
    assert!(dir.path().join("from_cli.txt").exists());
}

#[test]
fn test_verbose_output() {
    let dir = create_builtin_layout();

    create_test_cmd(dir.path())
        .args(["--verbose", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mobility"))
        .stdout(predicate::str::contains("centralized_packets_60.txt"))
        .stderr(predicate::str::contains("INFO"));
}

#[test]
fn test_json_logs() {
    let dir = create_builtin_layout();

    let output = create_test_cmd(dir.path())
        .args(["--verbose", "--log-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let entries: Vec<Value> = stderr
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|e| e["level"].is_string() && e["message"].is_string()));
}

#[test]
fn test_help_output() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"))
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--print-manifest"));

    create_test_cmd(dir.path())
        .args(["--no-color", "--help-topic", "manifest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groups"));
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stratos-stats"));
}
