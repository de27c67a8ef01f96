//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Fire `shutdown` when the process receives Ctrl+C (SIGINT).
pub async fn forward_ctrl_c(shutdown: &Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
        Err(e) => {
            // Without a handler the process simply runs until killed.
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    }
}
