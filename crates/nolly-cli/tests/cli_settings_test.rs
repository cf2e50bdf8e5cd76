#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("watchlist"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("nolly");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nolly"));
}

#[test]
fn test_config_init_then_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut init = cargo_bin_cmd!("nolly");
    init.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success();

    // Assert
    assert!(dir.path().join("config.toml").exists());
    let mut show = cargo_bin_cmd!("nolly");
    show.args(["config", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("en-US"))
        .stdout(predicate::str::contains("nolly.db"));
}

#[test]
fn test_config_init_twice_needs_force() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut first = cargo_bin_cmd!("nolly");
    first
        .args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success();

    // Act & Assert
    let mut second = cargo_bin_cmd!("nolly");
    second
        .args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
