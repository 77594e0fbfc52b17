//! Status command: check the local environment and the editor's IPC server

use std::time::Duration;

use anyhow::Result;

use pb_core::config::BridgeConfig;
use pb_core::python;

/// How long to wait for the IPC server to answer a ping
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Print a quick health check of everything the bridge depends on
pub async fn status_command(config: &BridgeConfig) -> Result<()> {
    println!();

    let address = config.ipc_address();
    match pb_bridge::ping(&address, PING_TIMEOUT).await {
        Ok(rtt) => {
            println!(
                "  IPC server:  \x1b[32m●\x1b[0m {} ({} ms)",
                address,
                rtt.as_millis()
            );
        }
        Err(_) => {
            println!("  IPC server:  \x1b[31m●\x1b[0m not reachable at {}", address);
            println!("               Is the editor running?");
        }
    }

    match python::python_version(&config.python_command) {
        Some(version) => {
            println!(
                "  Python:      \x1b[32m●\x1b[0m {} ({})",
                version, config.python_command
            );
        }
        None => {
            println!(
                "  Python:      \x1b[31m●\x1b[0m '{}' not found",
                config.python_command
            );
        }
    }

    match python::pipenv_version() {
        Some(version) => println!("  pipenv:      \x1b[32m●\x1b[0m {}", version),
        None => {
            println!("  pipenv:      \x1b[33m●\x1b[0m not installed");
            println!("               The dependency build needs it: pip install pipenv");
        }
    }

    if python::in_virtualenv(&config.python_command) {
        println!("  Virtualenv:  \x1b[32m●\x1b[0m active");
    } else {
        println!("  Virtualenv:  \x1b[90m●\x1b[0m none active");
    }

    let controllers = config.controllers_dir();
    if controllers.is_dir() {
        let pipfile = if config.controllers_pipfile().exists() {
            "Pipfile present"
        } else {
            "no Pipfile"
        };
        println!(
            "  Controllers: \x1b[32m●\x1b[0m {} ({})",
            controllers.display(),
            pipfile
        );
    } else {
        println!(
            "  Controllers: \x1b[33m●\x1b[0m {} not found",
            controllers.display()
        );
    }

    println!();
    Ok(())
}
