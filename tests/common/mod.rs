//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rr_proxy::http::HttpServer;
use rr_proxy::lifecycle::Shutdown;
use rr_proxy::load_balancer::BackendPool;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A raw-TCP backend that answers every request with its name.
pub struct MockBackend {
    pub name: &'static str,
    pub addr: SocketAddr,
    /// Status returned to every request, probes included.
    pub status: Arc<AtomicU16>,
    /// Non-HEAD requests served.
    pub hits: Arc<AtomicUsize>,
    /// Request heads (request line + headers) of non-HEAD requests.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<String> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        201 => "201 Created",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Read until the end of the request head, then drain a `Content-Length` body.
async fn read_request(socket: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let chunked = head
        .to_ascii_lowercase()
        .contains("transfer-encoding: chunked");

    let mut body = buf[head_end..].to_vec();
    while chunked && !body.ends_with(b"0\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Some((head, body))
}

/// Start a mock backend on an ephemeral port.
///
/// GET and friends receive `<name>` followed by any request body; HEAD receives headers only.
pub async fn start_mock_backend(name: &'static str) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let backend = MockBackend {
        name,
        addr,
        status: Arc::new(AtomicU16::new(200)),
        hits: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let status = backend.status.clone();
    let hits = backend.hits.clone();
    let requests = backend.requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let status = status.clone();
            let hits = hits.clone();
            let requests = requests.clone();
            tokio::spawn(async move {
                let Some((head, body)) = read_request(&mut socket).await else {
                    return;
                };
                let is_head = head.starts_with("HEAD ");

                let mut payload = name.as_bytes().to_vec();
                payload.extend_from_slice(&body);

                let mut response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Backend: {}\r\nConnection: close\r\n\r\n",
                    status_line(status.load(Ordering::SeqCst)),
                    payload.len(),
                    name
                )
                .into_bytes();

                if !is_head {
                    hits.fetch_add(1, Ordering::SeqCst);
                    requests.lock().unwrap().push(head);
                    response.extend_from_slice(&payload);
                }

                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    backend
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Serve `pool` on an ephemeral port. Drop or trigger the returned `Shutdown` to stop.
pub async fn start_proxy(pool: Arc<BackendPool>, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(pool);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
