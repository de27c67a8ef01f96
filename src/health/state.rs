//! Backend health state machine.
//!
//! # States
//! - Healthy: backend receives traffic
//! - Unhealthy: backend excluded from load balancing
//!
//! # State Transitions
//! ```text
//! Healthy → Unhealthy: one probe that errors or returns anything but 200
//! Unhealthy → Healthy: one probe that returns 200
//! ```
//!
//! There is no hysteresis: a flapping backend flaps in the pool too.

use axum::http::StatusCode;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

impl HealthState {
    /// Classify a probe result. Only `200 OK` counts as healthy.
    pub fn from_probe<E>(result: &Result<StatusCode, E>) -> Self {
        match result {
            Ok(StatusCode::OK) => HealthState::Healthy,
            _ => HealthState::Unhealthy,
        }
    }

    pub fn is_healthy(self) -> bool {
        self == HealthState::Healthy
    }
}

impl From<bool> for HealthState {
    fn from(healthy: bool) -> Self {
        if healthy {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        }
    }
}
