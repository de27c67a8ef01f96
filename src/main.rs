//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                LOAD BALANCER                  │
//!                        │                                               │
//!   Client Request       │  ┌──────────┐    ┌──────────────┐             │
//!   ─────────────────────┼─▶│  http    │───▶│ round_robin  │             │
//!                        │  │  server  │    │   cursor     │             │
//!                        │  └────┬─────┘    └──────┬───────┘             │
//!                        │       │                 │ reads health        │
//!                        │       │                 ▼                     │
//!                        │       │          ┌──────────────┐   writes    │
//!                        │       │          │ backend pool │◀──────────┐ │
//!                        │       │          └──────────────┘           │ │
//!   Client Response      │       ▼                              ┌──────┴─┐│
//!   ◀────────────────────┼── forward / 503 ───────────────────▶ │ health ││──▶ Backends
//!                        │                                      │probers ││
//!                        │                                      └────────┘│
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rr_proxy::config::load_config;
use rr_proxy::lifecycle::{self, Shutdown, signals};
use rr_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "rr-proxy")]
#[command(about = "Round-robin HTTP load balancer with active health checks", long_about = None)]
struct Cli {
    /// Path to the JSON or TOML config file.
    #[arg(short, long, env = "RR_PROXY_CONFIG", default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match load_config(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(None);
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    init_logging(Some(&settings.log_level));
    tracing::info!("rr-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        backends = settings.servers_urls.len(),
        health_check_interval = ?settings.health_check_interval,
        bind_address = %settings.bind_address,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::forward_ctrl_c(&signal_shutdown).await;
    });

    if let Err(e) = lifecycle::run(settings, &shutdown).await {
        tracing::error!(error = %e, "Load balancer failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
