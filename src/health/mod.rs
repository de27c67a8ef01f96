//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     One timer per backend
//!     → HEAD probe to that backend
//!     → classify via state.rs
//!     → write the backend's health flag
//! ```
//!
//! # Design Decisions
//! - Probers are independent; one slow backend never delays another
//! - Forwarding failures do not touch health; only probes do
//! - Health state is per-backend, not per-pool

pub mod active;
pub mod state;

pub use active::{HealthProber, spawn_probers};
pub use state::HealthState;
