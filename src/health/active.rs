//! Active health checking.
//!
//! # Responsibilities
//! - Run one independent probe loop per backend
//! - Probe with `HEAD <backend url>` on a fixed period
//! - Write the result into that backend's health flag
//!
//! # Design Decisions
//! - No probe timeout: a hung backend delays only its own next tick
//! - First probe fires one full period after start
//! - Missed ticks are skipped, never bursted
//! - Loops exit only on the pool-lifetime shutdown signal

use std::sync::Arc;
use std::time::Duration;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::health::state::HealthState;
use crate::lifecycle::Shutdown;
use crate::load_balancer::{Backend, BackendPool};

const USER_AGENT: &str = "rr-proxy-health-check";

/// HTTP client shared by all probers.
pub type ProbeClient = Client<HttpConnector, Body>;

/// Build the client used for probing.
pub fn probe_client() -> ProbeClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Periodic prober for a single backend.
pub struct HealthProber {
    backend: Arc<Backend>,
    interval: Duration,
    client: ProbeClient,
}

impl HealthProber {
    pub fn new(backend: Arc<Backend>, interval: Duration, client: ProbeClient) -> Self {
        Self {
            backend,
            interval,
            client,
        }
    }

    /// Run the probe loop on its own task.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Probe every `interval` until shutdown fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!(
            backend = %self.backend.address(),
            interval = ?self.interval,
            "Health prober starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::debug!(backend = %self.backend.address(), "Health prober stopping");
                    break;
                }
            }
        }
    }

    /// Issue one probe and record its outcome on the backend.
    pub async fn probe_once(&self) -> HealthState {
        let result = self.probe().await;
        let state = HealthState::from_probe(&result);

        match &result {
            Ok(status) => tracing::trace!(backend = %self.backend.address(), %status, "Probe completed"),
            Err(e) => tracing::trace!(backend = %self.backend.address(), error = %e, "Probe failed"),
        }

        let was_healthy = self.backend.set_healthy(state.is_healthy());
        if was_healthy != state.is_healthy() {
            if state.is_healthy() {
                tracing::info!(backend = %self.backend.address(), "Backend is healthy again");
            } else {
                tracing::warn!(backend = %self.backend.address(), "Backend marked unhealthy");
            }
        }
        state
    }

    async fn probe(&self) -> Result<StatusCode, Box<dyn std::error::Error + Send + Sync>> {
        let request = Request::builder()
            .method(Method::HEAD)
            .uri(self.backend.url.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        Ok(response.status())
    }
}

/// Start one prober per backend, all bound to the same shutdown signal.
pub fn spawn_probers(pool: &BackendPool, interval: Duration, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
    let client = probe_client();

    tracing::info!(
        backends = pool.len(),
        interval = ?interval,
        "Starting health probers"
    );

    pool.backends()
        .iter()
        .map(|backend| {
            HealthProber::new(backend.clone(), interval, client.clone()).spawn(shutdown.subscribe())
        })
        .collect()
}
