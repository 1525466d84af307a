//! Integration tests for the `incipit` binary.
//!
//! These exercise argument handling, listings, and the error paths
//! that do not spawn external programs; full bootstrap runs are
//! covered against in-memory adapters elsewhere.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn incipit() -> Command {
    let mut cmd = Command::cargo_bin("incipit").expect("binary builds");
    // isolate from any user-level configuration
    let home = std::env::temp_dir();
    cmd.env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join("xdg-config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    incipit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_prints_package_version() {
    incipit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_shows_usage() {
    incipit()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_shows_licenses_and_build_systems() {
    incipit()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("MIT"))
        .stdout(predicate::str::contains("Apache-2.0"))
        .stdout(predicate::str::contains("setuptools"))
        .stdout(predicate::str::contains("poetry"));
}

#[test]
fn list_licenses_filter_excludes_build_systems() {
    incipit()
        .args(["list", "--licenses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MIT"))
        .stdout(predicate::str::contains("flit").not());
}

#[test]
fn completions_generate_a_script() {
    incipit()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("incipit"));
}

#[test]
fn new_refuses_a_non_empty_folder() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("occupied.txt"), "hello").unwrap();

    incipit()
        .args(["new", "--yes"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not empty"));
}

#[test]
fn new_rejects_an_unknown_license() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("project");

    incipit()
        .args(["new", "--yes", "--license", "WTFPL"])
        .arg(&target)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown license"));
}

#[test]
fn new_rejects_a_malformed_option() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("project");

    incipit()
        .args(["new", "--yes", "-o", "AUTHOR_NAME"])
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn new_rejects_an_invalid_build_system() {
    incipit()
        .args(["new", "demo", "--build-system", "bazel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    incipit()
        .args(["--config", "/definitely/not/here.toml", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cannot read"));
}
