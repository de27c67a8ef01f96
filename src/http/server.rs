//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Ask the load balancer for a backend per request
//! - Forward to that backend, or answer 503 when none is healthy
//! - Stop serving when the shutdown signal fires

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::http::{request, response};
use crate::lifecycle::shutdown;
use crate::load_balancer::{BackendPool, LoadBalancer, RoundRobin};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub balancer: Arc<dyn LoadBalancer>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server that balances round-robin over `pool`.
    pub fn new(pool: Arc<BackendPool>) -> Self {
        Self::with_balancer(pool, Arc::new(RoundRobin::new()))
    }

    /// Create a server with an explicit selection strategy.
    pub fn with_balancer(pool: Arc<BackendPool>, balancer: Arc<dyn LoadBalancer>) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .build(HttpConnector::new());

        let state = AppState {
            pool,
            balancer,
            client,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Load balancer is running");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Select a backend and forward the request to it.
async fn proxy_handler(State(state): State<AppState>, req: Request<Body>) -> Response {
    let backend = match state.balancer.next_server(state.pool.backends()) {
        Some(b) => b,
        None => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                backends = state.pool.len(),
                "No healthy backend available"
            );
            return response::no_backend();
        }
    };

    let client_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    tracing::debug!(
        backend = %backend.address(),
        method = %req.method(),
        path = %req.uri().path(),
        "Forwarding request"
    );

    let upstream = match request::forward_request(req, &backend, client_addr) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(backend = %backend.address(), error = %e, "Failed to build upstream request");
            return response::bad_gateway(&backend);
        }
    };

    match state.client.request(upstream).await {
        Ok(upstream_response) => response::from_upstream(upstream_response, &backend),
        Err(e) => {
            tracing::error!(backend = %backend.address(), error = %e, "Upstream request failed");
            response::bad_gateway(&backend)
        }
    }
}
