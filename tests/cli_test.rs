use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("fitness-history").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Browse AI fitness-tracker analyses"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("fitness-history").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("fitness-history").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_fitness-history"));
}

#[test]
fn test_config_init_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut cmd = Command::cargo_bin("fitness-history").unwrap();
    cmd.arg("--config").arg(&path).arg("config").arg("init");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("base_url = \"http://localhost:5000\""));
}

#[test]
fn test_analyze_missing_image_fails() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("fitness-history").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("analyze")
        .arg(dir.path().join("missing.png"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Image not found"));
}
