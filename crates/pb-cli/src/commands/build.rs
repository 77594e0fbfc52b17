//! Build command: run the Python dependency build once

use anyhow::Result;

use pb_bridge::{run_python_build, BuildOutcome};
use pb_core::config::BridgeConfig;

use crate::output::{print_info, print_success};

pub async fn build_command(config: BridgeConfig) -> Result<()> {
    let outcome = run_python_build(&config).await?;

    match outcome {
        BuildOutcome::NoPipfile => {
            print_info(&format!(
                "No Pipfile found at {}, nothing to build",
                config.controllers_pipfile().display()
            ));
        }
        outcome => print_success(&format!("Python build complete: {}", outcome)),
    }

    Ok(())
}
