//! Route lookup and dispatch decision.
//!
//! # Responsibilities
//! - Recognise CORS preflight requests
//! - Send stream-prefixed paths to the proxy engine
//! - Fall through to static file delivery for everything else
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Preflight is checked before the prefix, for every path
//! - Explicit composition: the caller owns the handlers, the router only decides
//! - A prefixed path with a `..` segment (plain or percent-encoded) is not
//!   proxied: URL normalisation would resolve it above the prefix on the
//!   origin. It falls through to static delivery, which rejects it

use axum::http::Method;

use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Where a request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `OPTIONS` on any path: empty `200`, nothing forwarded.
    Preflight,
    /// Forwarded verbatim to the upstream origin.
    Proxy,
    /// Served from the local static root.
    Static,
}

/// Classifies incoming requests.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    proxy: PathPrefixMatcher,
}

impl RequestRouter {
    pub fn new(proxy_prefix: impl Into<String>) -> Self {
        Self {
            proxy: PathPrefixMatcher::new(proxy_prefix),
        }
    }

    /// Decide which handler owns a request.
    pub fn classify(&self, method: &Method, path: &str) -> Route {
        if *method == Method::OPTIONS {
            Route::Preflight
        } else if self.proxy.matches_path(path) && !has_parent_segment(path) {
            Route::Proxy
        } else {
            Route::Static
        }
    }
}

/// True if any path segment resolves to `..` under URL normalisation.
fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == ".."
    })
}
