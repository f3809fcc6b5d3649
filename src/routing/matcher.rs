//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Only the path component is inspected; the query never matches
//! - No regex to guarantee O(n) matching

use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request path matches this condition.
    fn matches_path(&self, path: &str) -> bool;

    /// Returns true if the request matches this condition.
    fn matches<B>(&self, req: &Request<B>) -> bool
    where
        Self: Sized,
    {
        self.matches_path(req.uri().path())
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches_path(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}
