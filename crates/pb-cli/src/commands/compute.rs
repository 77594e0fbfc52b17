//! Compute command: run one page-state computation from the terminal

use std::io::Write;

use anyhow::{Context, Result};

use pb_bridge::compute::compute_initial_state;
use pb_core::config::BridgeConfig;

/// Run the controller's compute entry point and print its raw output
///
/// The payload is whatever the controller printed; it passes through
/// untouched so the output can be piped into other tools.
pub async fn compute_command(config: BridgeConfig, route: &str, state: &str) -> Result<()> {
    let output = compute_initial_state(&config, route, state).await?;

    std::io::stdout()
        .write_all(&output)
        .context("Failed to write state to stdout")?;

    Ok(())
}
