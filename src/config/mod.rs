//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON or TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (interval, port)
//!     → Settings (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup; there is no reload
//! - Any error here is fatal before traffic is served
//! - Backend addresses are parsed by the pool, not here

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, load_config, read_config};
pub use schema::BalancerConfig;
pub use validation::{Settings, ValidationError, validate_config};
