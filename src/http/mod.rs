//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum catch-all, asks the load balancer)
//!     → request.rs (rewrite URI/Host, strip hop-by-hop headers)
//!     → backend
//!     → response.rs (relay, add X-Forwarded-Server)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use response::{NO_BACKEND_MESSAGE, X_FORWARDED_SERVER};
pub use server::HttpServer;
