//! Python tooling detection
//!
//! Probes the local Python and pipenv installations the dependency build
//! relies on. Probes are best-effort: a missing or broken tool reports as
//! absent, never as an error.

use std::process::Command;

/// Snippet run inside the interpreter to detect an active virtual environment
const VENV_PROBE: &str =
    "import sys; sys.exit(0 if sys.prefix != getattr(sys, 'base_prefix', sys.prefix) else 1)";

/// Check if pipenv is installed and runnable
pub fn is_pipenv_installed() -> bool {
    Command::new("pipenv")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Get the installed pipenv version, if any
pub fn pipenv_version() -> Option<String> {
    let output = Command::new("pipenv").arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    parse_pipenv_version(&String::from_utf8_lossy(&output.stdout))
}

/// Get the version of a Python interpreter, if it can be run
pub fn python_version(python: &str) -> Option<String> {
    let output = Command::new(python).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    // Python 2 printed the version banner to stderr
    let raw = if output.stdout.is_empty() {
        output.stderr
    } else {
        output.stdout
    };
    parse_python_version(&String::from_utf8_lossy(&raw))
}

/// Check whether the bridge itself runs inside a virtual environment
///
/// `VIRTUAL_ENV` is authoritative when set; otherwise the interpreter is
/// asked directly.
pub fn in_virtualenv(python: &str) -> bool {
    if std::env::var_os("VIRTUAL_ENV").is_some() {
        tracing::debug!("VIRTUAL_ENV is set, assuming an active virtual environment");
        return true;
    }

    Command::new(python)
        .args(["-c", VENV_PROBE])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

// "pipenv, version 2023.12.1" -> "2023.12.1"
fn parse_pipenv_version(stdout: &str) -> Option<String> {
    stdout.split_whitespace().last().map(str::to_string)
}

// "Python 3.11.4" -> "3.11.4"
fn parse_python_version(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.strip_prefix("Python ").unwrap_or(trimmed).to_string())
}
