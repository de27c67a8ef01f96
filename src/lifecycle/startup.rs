//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the backend pool from validated settings
//! - Start one health prober per backend
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Bind before spawning probers, so a bind failure leaves nothing running

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::health::spawn_probers;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::load_balancer::{BackendPool, PoolError};

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Build the pool, start probing, and serve on `settings.bind_address`.
///
/// Returns once `shutdown` fires and in-flight requests have completed.
pub async fn run(settings: Settings, shutdown: &Shutdown) -> Result<(), StartupError> {
    let pool = Arc::new(BackendPool::from_urls(&settings.servers_urls)?);
    if pool.is_empty() {
        tracing::warn!("No backends configured; every request will get 503");
    }

    let listener = TcpListener::bind(&settings.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: settings.bind_address.clone(),
            source,
        })?;

    let probers = spawn_probers(&pool, settings.health_check_interval, shutdown);

    let server = HttpServer::new(pool);
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)?;

    for handle in probers {
        let _ = handle.await;
    }
    Ok(())
}
