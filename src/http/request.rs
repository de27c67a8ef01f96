//! Request handling and transformation.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the chosen backend
//! - Rewrite `Host` to the backend's authority
//! - Strip hop-by-hop headers, append `X-Forwarded-For`
//!
//! # Design Decisions
//! - Method, body and end-to-end headers pass through untouched
//! - The body is streamed, never buffered

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request, Uri, Version, header};

use crate::load_balancer::Backend;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in named.iter().map(String::as_str).chain(HOP_BY_HOP) {
        headers.remove(name);
    }
}

/// Join two URL paths with exactly one slash between them.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Map a client request URI onto `backend`.
///
/// Paths are joined (`/base` + `/x` → `/base/x`) and queries concatenated with `&`.
pub fn upstream_uri(backend: &Backend, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path = join_paths(backend.url.path(), original.path());
    let query = match (backend.url.query(), original.query()) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Some(format!("{}&{}", a, b)),
        (Some(a), _) if !a.is_empty() => Some(a.to_string()),
        (_, Some(b)) if !b.is_empty() => Some(b.to_string()),
        _ => None,
    };

    let path_and_query = match query {
        Some(q) => format!("{}?{}", path, q),
        None => path,
    };

    Uri::builder()
        .scheme(backend.url.scheme())
        .authority(backend.authority())
        .path_and_query(path_and_query)
        .build()
}

/// Turn the inbound request into the one sent to `backend`.
pub fn forward_request(
    request: Request<Body>,
    backend: &Backend,
    client_addr: Option<SocketAddr>,
) -> Result<Request<Body>, axum::http::Error> {
    let (mut parts, body) = request.into_parts();

    parts.uri = upstream_uri(backend, &parts.uri)?;
    parts.version = Version::HTTP_11;

    strip_hop_by_hop(&mut parts.headers);
    parts
        .headers
        .insert(header::HOST, HeaderValue::from_str(backend.authority())?);

    if let Some(addr) = client_addr {
        let ip = addr.ip().to_string();
        let value = match parts.headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(prior) => format!("{}, {}", prior, ip),
            None => ip,
        };
        parts.headers.insert(X_FORWARDED_FOR, HeaderValue::from_str(&value)?);
    }

    Ok(Request::from_parts(parts, body))
}
