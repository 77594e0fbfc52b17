//! Page-state compute subprocess
//!
//! The generated controller package exposes a `server` module whose
//! `compute` entry point prints a page's initial state to stdout.

use tokio::process::Command;

use pb_core::config::BridgeConfig;
use pb_core::ComputeError;

/// Compute the initial state for a route
///
/// Spawns `<python> -m server compute --route <route> state <page_state>`
/// in the controllers directory and returns the raw stdout. The argument
/// list, including the bare `state` token, is the contract of the generated
/// controller package.
pub async fn compute_initial_state(
    config: &BridgeConfig,
    route: &str,
    page_state: &str,
) -> Result<Vec<u8>, ComputeError> {
    let controllers_dir = config.controllers_dir();
    tracing::debug!(
        "Computing initial state for route '{}' in {}",
        route,
        controllers_dir.display()
    );

    let output = Command::new(&config.python_command)
        .args(["-m", "server", "compute", "--route", route, "state", page_state])
        .current_dir(&controllers_dir)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ComputeError::Spawn {
            command: config.python_command.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ComputeError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::debug!(
        "Computed {} bytes of state for route '{}'",
        output.stdout.len(),
        route
    );
    Ok(output.stdout)
}
