//! Header manipulation and fixed response headers.
//!
//! # Responsibilities
//! - Filter upstream response headers before they reach the client
//! - Add CORS and no-cache headers to every response
//!
//! # Design Decisions
//! - Upstream `Content-Length` is never trusted; the engine sets its own
//! - Fixed headers override whatever the handler produced, so each one
//!   appears exactly once on static, proxied and error responses alike

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Upstream response headers never forwarded to the client.
pub const EXCLUDED_UPSTREAM_HEADERS: [HeaderName; 3] = [
    header::TRANSFER_ENCODING,
    header::CONTENT_ENCODING,
    header::CONTENT_LENGTH,
];

/// Headers present on every response.
pub fn fixed_headers() -> [(HeaderName, HeaderValue); 6] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ),
        (header::PRAGMA, HeaderValue::from_static("no-cache")),
        (header::EXPIRES, HeaderValue::from_static("0")),
    ]
}

/// Copy upstream headers into `out`, skipping [`EXCLUDED_UPSTREAM_HEADERS`].
///
/// Multi-valued headers keep all their values.
pub fn copy_upstream_headers(upstream: &HeaderMap, out: &mut HeaderMap) {
    for (name, value) in upstream.iter() {
        if !EXCLUDED_UPSTREAM_HEADERS.contains(name) {
            out.append(name.clone(), value.clone());
        }
    }
}

/// Wrap `router` so every response carries the fixed headers.
pub fn with_fixed_headers(router: Router) -> Router {
    fixed_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
}
