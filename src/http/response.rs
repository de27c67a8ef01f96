//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the backend response (status, headers, streamed body)
//! - Tag every forwarded response with `X-Forwarded-Server`
//! - Produce the 503 and 502 responses the dispatcher can emit

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{HeaderValue, Response, StatusCode, header};
use axum::response::IntoResponse;

use crate::http::request::strip_hop_by_hop;
use crate::load_balancer::Backend;

pub const X_FORWARDED_SERVER: &str = "x-forwarded-server";

/// Body of the 503 sent when every backend is unhealthy.
pub const NO_BACKEND_MESSAGE: &str = "No healthy server found";

fn tag_backend<B>(response: &mut Response<B>, backend: &Backend) {
    match HeaderValue::from_str(backend.address()) {
        Ok(value) => {
            response.headers_mut().insert(X_FORWARDED_SERVER, value);
        }
        Err(e) => {
            tracing::debug!(backend = %backend.address(), error = %e, "Backend address is not a valid header value");
        }
    }
}

/// Relay a backend response to the client.
pub fn from_upstream<B>(response: Response<B>, backend: &Backend) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);

    let mut response = Response::from_parts(parts, Body::new(body));
    tag_backend(&mut response, backend);
    response
}

/// No backend could be selected.
pub fn no_backend() -> Response<Body> {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NO_BACKEND_MESSAGE,
    )
        .into_response()
}

/// Forwarding to `backend` failed at the transport level.
pub fn bad_gateway(backend: &Backend) -> Response<Body> {
    let mut response = StatusCode::BAD_GATEWAY.into_response();
    tag_backend(&mut response, backend);
    response
}
