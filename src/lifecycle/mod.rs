//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → BackendPool → probers → listener → serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C → Shutdown::trigger → probers exit, server drains
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{StartupError, run};
