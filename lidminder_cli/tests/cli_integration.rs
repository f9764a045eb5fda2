use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config with short thresholds for sim runs
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[debounce]
window_ms = 10

[thresholds]
warn_ms = 1000
critical_ms = 2000
alarm_ms = 3000
grace_unit_ms = 500

[alarm]
visible_interval_ms = 100
audible_max_ms = 10000
audible_min_ms = 1000
beep_on_ms = 50
beep_off_ms = 50
beeps_per_burst = 2
tone_hz = 1760

# real wall time must pass for the debounce window, so keep a small pause
[run]
poll_ms = 1
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn bin() -> Command {
    Command::cargo_bin("lidminder").expect("binary built")
}

#[test]
fn help_prints_usage() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn bounded_sim_run_prints_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    bin()
        .args(["--config"])
        .arg(&cfg)
        .args(["run", "--max-ticks", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ticks=50"))
        .stdout(predicate::str::contains("lid=lowered"));
}

#[test]
fn json_mode_emits_structured_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let out = bin()
        .args(["--json", "--config"])
        .arg(&cfg)
        .args(["run", "--max-ticks", "10"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(out).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(line.lines().last().unwrap()).expect("summary is valid JSON");
    assert_eq!(value["ticks"], 10);
    assert_eq!(value["alarm_active"], false);
}

#[test]
fn start_raised_is_reflected_in_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    bin()
        .args(["--config"])
        .arg(&cfg)
        .args(["run", "--max-ticks", "50", "--start-raised"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lid=raised"));
}

#[test]
fn selftest_completes() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    bin()
        .args(["--config"])
        .arg(&cfg)
        .arg("selftest")
        .assert()
        .success()
        .stdout(predicate::str::contains("selftest complete"));
}

#[rstest]
#[case("missing.toml", "not found")]
fn explicit_missing_config_fails(#[case] name: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    bin()
        .args(["--config"])
        .arg(dir.path().join(name))
        .args(["run", "--max-ticks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(needle));
}

#[test]
fn invalid_thresholds_fail_with_humanized_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        "[thresholds]\nwarn_ms = 2000\ncritical_ms = 2000\nalarm_ms = 3000\n",
    )
    .unwrap();
    bin()
        .args(["--config"])
        .arg(&path)
        .args(["run", "--max-ticks", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strictly increasing"));
}
