//! Observability subsystem.
//!
//! Logging only: every subsystem emits `tracing` events with structured
//! fields, and `logging.rs` installs the subscriber that prints them.

pub mod logging;

pub use logging::init_logging;
