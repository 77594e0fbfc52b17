//! Bridge configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::serde_utils::duration_secs;
use crate::ipc::{DEFAULT_CLIENT_NAME, DEFAULT_IPC_PORT};

/// Configuration for the bridge process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Port the editor's IPC server listens on (localhost only)
    pub ipc_port: u16,

    /// Application root directory; the generated Python controllers live
    /// in `<app_dir>/controllers`
    pub app_dir: PathBuf,

    /// Name this process registers under with the IPC server
    pub client_name: String,

    /// Python interpreter used for controller subprocesses
    pub python_command: String,

    /// Connection timeout
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,

    /// Backoff settings for reconnection
    pub backoff: BackoffConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ipc_port: DEFAULT_IPC_PORT,
            app_dir: PathBuf::from("."),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            python_command: "python".to_string(),
            connect_timeout: Duration::from_secs(10),
            backoff: BackoffConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Get the IPC server address
    pub fn ipc_address(&self) -> String {
        crate::ipc::ipc_address(self.ipc_port)
    }

    /// Directory holding the generated Python controllers
    pub fn controllers_dir(&self) -> PathBuf {
        self.app_dir.join("controllers")
    }

    /// Pipfile the editor writes next to the controllers
    pub fn controllers_pipfile(&self) -> PathBuf {
        self.controllers_dir().join("Pipfile")
    }

    /// Pipfile pipenv manages at the application root
    pub fn app_pipfile(&self) -> PathBuf {
        self.app_dir.join("Pipfile")
    }
}

/// Exponential backoff configuration for reconnection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Initial delay between attempts
    #[serde(with = "duration_secs")]
    pub initial: Duration,

    /// Maximum delay between attempts
    #[serde(with = "duration_secs")]
    pub max: Duration,

    /// Multiplier applied after each attempt
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0)
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(4),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}
