//! CLI integration tests
//!
//! Everything here runs offline: commands that would reach the IPC server
//! or pipenv are exercised only far enough to check argument handling and
//! filesystem behavior.

use assert_cmd::Command;
use predicates::prelude::*;

fn pybridge() -> Command {
    Command::cargo_bin("pybridge").expect("Failed to locate pybridge binary")
}

#[test]
fn test_cli_help() {
    pybridge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pybridge"))
        .stdout(predicate::str::contains("Python controllers"));
}

#[test]
fn test_cli_version() {
    pybridge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pybridge"));
}

#[test]
fn test_cli_connect_help() {
    pybridge()
        .args(["connect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("relay commands"));
}

#[test]
fn test_cli_build_help() {
    pybridge()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency build"));
}

#[test]
fn test_cli_compute_help() {
    pybridge()
        .args(["compute", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("route"));
}

#[test]
fn test_cli_config_help() {
    pybridge()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration"));
}

#[test]
fn test_cli_unknown_command_fails() {
    pybridge().arg("frobnicate").assert().failure();
}

#[test]
fn test_cli_compute_requires_a_route() {
    pybridge().arg("compute").assert().failure();
}

#[test]
fn test_status_reports_unreachable_server() {
    // Port 1 is never listening for us; connection is refused immediately
    pybridge()
        .args(["status", "--port", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IPC server"))
        .stdout(predicate::str::contains("not reachable"));
}

#[test]
fn test_build_without_pipfile_reports_nothing_to_do() {
    let dir = tempfile::tempdir().expect("tempdir");

    pybridge()
        .args(["build", "--app-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to build"));
}

#[test]
fn test_deps_reads_the_controllers_pipfile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let controllers = dir.path().join("controllers");
    std::fs::create_dir_all(&controllers).expect("mkdir");
    std::fs::write(
        controllers.join("Pipfile"),
        "[packages]\nrequests = \"==2.28.1\"\n\n[dev-packages]\npytest = \"*\"\n",
    )
    .expect("write Pipfile");

    pybridge()
        .args(["deps", "--app-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("requests"))
        .stdout(predicate::str::contains("==2.28.1"))
        .stdout(predicate::str::contains("pytest"));
}

#[test]
fn test_deps_without_pipfile() {
    let dir = tempfile::tempdir().expect("tempdir");

    pybridge()
        .args(["deps", "--app-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No Pipfile"));
}

#[cfg(unix)]
#[test]
fn test_compute_passes_route_and_state_to_the_interpreter() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("controllers")).expect("mkdir");

    pybridge()
        .args(["compute", "/home", "--python", "echo", "--app-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--route /home"))
        .stdout(predicate::str::contains("state {}"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");

    pybridge()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "init"])
        .assert()
        .success();

    assert!(config_path.exists());

    pybridge()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ipc_port"));
}

#[test]
fn test_config_path_prints_a_location() {
    pybridge()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
