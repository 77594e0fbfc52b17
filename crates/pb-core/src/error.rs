//! Core error types for pybridge

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type covering everything a command handler can fail with
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IPC error: {0}")]
    Ipc(#[from] IpcError),

    #[error("Compute error: {0}")]
    Compute(#[from] ComputeError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the editor's IPC server
#[derive(Error, Debug)]
pub enum IpcError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the page-state compute subprocess
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Compute process failed ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Errors from the Python dependency build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("pipenv is not installed; install it with 'pip install pipenv' and retry")]
    PipenvNotInstalled,

    #[error("Failed to detect the virtual environment type; currently supported: pipenv")]
    UnsupportedEnvironment,

    #[error("Invalid Pipfile: {0}")]
    Pipfile(#[from] toml::de::Error),

    #[error("pipenv install failed ({status})")]
    InstallFailed { status: std::process::ExitStatus },

    #[error("pipenv install failed for '{package}' ({status})")]
    PackageInstallFailed {
        package: String,
        status: std::process::ExitStatus,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
