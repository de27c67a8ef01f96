//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → pool.rs (fixed, ordered backends)
//!     → round_robin.rs (advance cursor, skip unhealthy)
//!     → backend.rs (health flag read)
//!     → Return backend or None
//! ```
//!
//! # Design Decisions
//! - The pool is immutable after startup; only health flags change
//! - The cursor lives inside the algorithm and is never exposed
//! - Unhealthy backends excluded from selection

use std::fmt::Debug;
use std::sync::Arc;

pub mod backend;
pub mod pool;
pub mod round_robin;

pub use backend::Backend;
pub use pool::{BackendPool, PoolError};
pub use round_robin::RoundRobin;

/// A backend selection strategy.
pub trait LoadBalancer: Send + Sync + Debug {
    /// Pick the next backend to serve a request, or `None` if none is available.
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}
