//! Configuration schema definitions.
//!
//! The on-disk record is deliberately flat: a list of backend URLs, a probe
//! interval and a listen port. Field names also accept the capitalised
//! spellings used by older config files.

use serde::{Deserialize, Serialize};

/// Raw configuration as read from disk.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BalancerConfig {
    /// Backend addresses, in rotation order (e.g. "http://127.0.0.1:8081").
    #[serde(alias = "ServersURLs")]
    pub servers_urls: Vec<String>,

    /// Probe period as a duration string (e.g. "5s", "1m30s", "250ms").
    #[serde(alias = "HealthCheckInterval")]
    pub health_check_interval: String,

    /// Listen port: ":8080", "8080" or "host:port".
    #[serde(alias = "Port")]
    pub port: String,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
