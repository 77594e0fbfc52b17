//! Connect command: run the bridge against the editor's IPC server

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use pb_bridge::{run_bridge, LocalHandler};
use pb_core::config::BridgeConfig;

use crate::output::{print_error, print_info};

/// Run the bridge until Ctrl-C or SIGTERM
pub async fn connect_command(config: BridgeConfig) -> Result<()> {
    print_info(&format!(
        "Connecting to ipc server at {} as '{}'",
        config.ipc_address(),
        config.client_name
    ));
    print_info(&format!(
        "Application directory: {}",
        config.app_dir.display()
    ));

    let cancel = CancellationToken::new();

    // Stop cleanly on Ctrl-C or SIGTERM
    let cancel_signals = cancel.clone();
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, shutting down...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, shutting down...");
            }
        }

        cancel_signals.cancel();
    });

    let handler = Arc::new(LocalHandler::new(config.clone()));

    if let Err(e) = run_bridge(config, handler, cancel).await {
        print_error(&format!("Bridge stopped: {}", e));
        return Err(e.into());
    }

    print_info("Bridge stopped");
    Ok(())
}
