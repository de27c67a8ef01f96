//! Backend pool management.
//!
//! # Responsibilities
//! - Parse the configured backend addresses (all or nothing)
//! - Hold the fixed, ordered list of backends
//! - Expose per-backend health reads and writes

use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::load_balancer::backend::Backend;

/// Errors raised while building the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A configured address could not be used as a backend.
    #[error("Invalid backend address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// The ordered, fixed-length set of backends.
#[derive(Debug, Default)]
pub struct BackendPool {
    backends: Vec<Arc<Backend>>,
}

impl BackendPool {
    /// Build the pool from configured addresses.
    ///
    /// Fails on the first address that does not parse; no partial pool is returned.
    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Result<Self, PoolError> {
        let backends = urls
            .iter()
            .map(|raw| parse_backend_url(raw.as_ref()).map(|url| Arc::new(Backend::new(url))))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(backend_count = backends.len(), "Backend pool built");
        Ok(Self { backends })
    }

    /// All backends, in configuration order.
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Backend at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Arc<Backend>> {
        self.backends.get(index)
    }

    /// Health of the backend at `index`. Out-of-range indexes read as unhealthy.
    pub fn is_healthy(&self, index: usize) -> bool {
        self.backends.get(index).is_some_and(|b| b.is_healthy())
    }

    /// Set health of the backend at `index`. Out-of-range indexes are ignored.
    pub fn set_healthy(&self, index: usize, healthy: bool) {
        if let Some(backend) = self.backends.get(index) {
            backend.set_healthy(healthy);
        }
    }
}

fn parse_backend_url(raw: &str) -> Result<Url, PoolError> {
    let invalid = |reason: String| PoolError::InvalidAddress {
        address: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(invalid("missing host".to_string())),
    }
    Ok(url)
}
