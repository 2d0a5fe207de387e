use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const INPUT: &str = r#"{
    "terms": {
        "principal": "10000",
        "annual_rate": "8.5",
        "issue_date": "2024-01-15",
        "maturity_date": "2026-01-15",
        "term_periods": 24,
        "payment_frequency": "monthly"
    }
}"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bond.json"), INPUT).unwrap();
        Self { dir }
    }

    fn input(&self) -> String {
        self.dir.path().join("bond.json").display().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bamort").unwrap();
        cmd.env("BAMORT_CONFIG", self.dir.path().join("config.json"));
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn test_schedule_json_from_file() {
    let sb = Sandbox::new();
    let output = sb
        .cmd()
        .args(["schedule", "--input", &sb.input()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 24);
    assert_eq!(rows[0]["interest"], "70.83");
    assert_eq!(rows[0]["amortization"], "416.67");
    assert_eq!(rows[23]["closing_balance"], "0.00");
}

#[test]
fn test_schedule_from_stdin_with_method_flag() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["schedule", "--method", "french", "--output", "minimal"])
        .write_stdin(INPUT)
        .assert()
        .success()
        .stdout("24\n");
}

#[test]
fn test_unknown_method_fails() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["schedule", "--input", &sb.input(), "--method", "balloon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown amortization method"));
}

#[test]
fn test_invalid_terms_fail() {
    let sb = Sandbox::new();
    let bad = INPUT.replace("2026-01-15", "2023-01-15");
    sb.cmd()
        .args(["summary"])
        .write_stdin(bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maturity_date"));
}

#[test]
fn test_summary_minimal_prints_yield() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["summary", "--input", &sb.input(), "--output", "minimal"])
        .assert()
        .success()
        .stdout("4.427\n");
}

#[test]
fn test_calculate_table_output() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["calculate", "--input", &sb.input(), "--output", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amortization"))
        .stdout(predicate::str::contains("Methodology:"));
}

#[test]
fn test_calculate_csv_lists_periods() {
    let sb = Sandbox::new();
    let output = sb
        .cmd()
        .args(["calculate", "--input", &sb.input(), "--output", "csv"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    // header plus one line per period
    assert_eq!(text.lines().count(), 25);
    let header = text.lines().next().unwrap();
    assert!(header.split(',').any(|h| h == "total_cash_flow"));
}

#[test]
fn test_config_defaults_apply() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set", "output", "minimal"])
        .assert()
        .success();
    sb.cmd()
        .args(["config", "set", "method", "american"])
        .assert()
        .success();

    let saved = fs::read_to_string(sb.dir.path().join("config.json")).unwrap();
    assert!(saved.contains("american"));

    // Stored output format and method apply without flags
    sb.cmd()
        .args(["summary", "--input", &sb.input()])
        .assert()
        .success()
        .stdout("8.4996\n");

    sb.cmd().args(["config", "reset"]).assert().success();
    sb.cmd()
        .args(["config", "get", "method"])
        .assert()
        .success()
        .stdout(predicate::str::contains("null"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set", "currency", "PEN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_version() {
    Command::cargo_bin("bamort")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bamort "));
}
