//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server
//! - Track health state (Healthy/Unhealthy)
//! - Provide the forms of the address the proxy and prober need

use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Parsed address of the backend.
    pub url: Url,
    /// `host[:port]`, used as URI authority and `Host` header.
    authority: String,
    /// Display form, reported in `X-Forwarded-Server`.
    address: String,
    /// Current health flag. Written only by this backend's prober.
    healthy: AtomicBool,
}

impl Backend {
    /// Create a new backend. Backends start out healthy.
    ///
    /// The caller is expected to have checked that `url` carries a host.
    pub fn new(url: Url) -> Self {
        let host = url.host_str().unwrap_or_default();
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let address = if url.path() == "/" && url.query().is_none() {
            url.as_str().trim_end_matches('/').to_string()
        } else {
            url.to_string()
        };

        Self {
            url,
            authority,
            address,
            healthy: AtomicBool::new(true),
        }
    }

    /// The backend's `host[:port]`.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The backend address as reported to clients.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Return true if the last completed probe (or the initial state) says healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Overwrite the health flag. Returns the previous value.
    pub fn set_healthy(&self, healthy: bool) -> bool {
        self.healthy.swap(healthy, Ordering::AcqRel)
    }
}
