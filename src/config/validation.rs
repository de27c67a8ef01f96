//! Configuration validation.
//!
//! Turns the raw [`BalancerConfig`] into typed [`Settings`]. Backend
//! addresses are left as strings here; the pool parses them and owns
//! that failure.

use std::time::Duration;
use thiserror::Error;

use crate::config::schema::BalancerConfig;

/// A semantic problem with an otherwise well-formed config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid health_check_interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },

    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

/// Validated startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub servers_urls: Vec<String>,
    pub health_check_interval: Duration,
    /// Address to bind, always `host:port`.
    pub bind_address: String,
    pub log_level: String,
}

/// Validate a raw config. Returns every problem found, not just the first.
pub fn validate_config(config: &BalancerConfig) -> Result<Settings, Vec<ValidationError>> {
    let interval = parse_interval(&config.health_check_interval);
    let bind_address = parse_bind_address(&config.port);

    match (interval, bind_address) {
        (Ok(health_check_interval), Ok(bind_address)) => Ok(Settings {
            servers_urls: config.servers_urls.clone(),
            health_check_interval,
            bind_address,
            log_level: config.log_level.clone(),
        }),
        (interval, bind_address) => Err(interval
            .err()
            .into_iter()
            .chain(bind_address.err())
            .collect()),
    }
}

/// Parse a duration string. Zero is rejected since a timer cannot tick on it.
pub fn parse_interval(value: &str) -> Result<Duration, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidInterval {
        value: value.to_string(),
        reason,
    };

    let interval = humantime::parse_duration(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if interval.is_zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(interval)
}

/// Normalise ":8080", "8080" and "host:port" to a bindable `host:port`.
pub fn parse_bind_address(port: &str) -> Result<String, ValidationError> {
    let port = port.trim();
    let (host, port_str) = match port.rsplit_once(':') {
        Some(("", p)) => ("0.0.0.0", p),
        Some((h, p)) => (h, p),
        None => ("0.0.0.0", port),
    };

    port_str
        .parse::<u16>()
        .map(|p| format!("{}:{}", host, p))
        .map_err(|_| ValidationError::InvalidPort(port.to_string()))
}
