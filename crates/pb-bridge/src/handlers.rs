//! Command execution behind the relay loop

use async_trait::async_trait;

use pb_core::config::BridgeConfig;
use pb_core::BridgeError;

use crate::{build, compute};

/// Executes the commands the editor pushes
///
/// The relay loop only knows this trait. The CLI wires up [`LocalHandler`];
/// tests substitute a mock.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Compute a page's initial state, returning the raw bytes to hand back
    async fn compute_initial_state(
        &self,
        route: &str,
        page_state: &str,
    ) -> Result<Vec<u8>, BridgeError>;

    /// Build the Python dependency environment
    async fn python_build(&self) -> Result<(), BridgeError>;
}

/// Handler that relays commands to local subprocesses
pub struct LocalHandler {
    config: BridgeConfig,
}

impl LocalHandler {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandHandler for LocalHandler {
    async fn compute_initial_state(
        &self,
        route: &str,
        page_state: &str,
    ) -> Result<Vec<u8>, BridgeError> {
        Ok(compute::compute_initial_state(&self.config, route, page_state).await?)
    }

    async fn python_build(&self) -> Result<(), BridgeError> {
        let outcome = build::run_python_build(&self.config).await?;
        tracing::info!("Python build finished: {}", outcome);
        Ok(())
    }
}
