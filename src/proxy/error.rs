//! Error types for the proxy engine.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything that can end a proxied request early.
///
/// All variants are terminal for the request and never retried.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The origin did not answer within the configured timeout.
    #[error("upstream request timed out")]
    Timeout,

    /// The origin refused the connection or could not be reached.
    #[error("cannot connect to stream server: {0}")]
    Unreachable(String),

    /// A playlist body was not valid UTF-8.
    #[error("playlist is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The request path could not form a valid upstream URL.
    #[error("invalid upstream url {target}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// Any other failure while talking to the origin.
    #[error("{0}")]
    Upstream(String),

    /// Response construction error.
    #[error("HTTP error: {0}")]
    Http(#[from] axum::http::Error),

    /// The rewrite pattern failed to compile.
    #[error("invalid rewrite pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ProxyError {
    /// Short label used in logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            ProxyError::Timeout => "timeout",
            ProxyError::Unreachable(_) => "unreachable",
            _ => "upstream_failure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message written to the client.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::Timeout => "Gateway Timeout".to_string(),
            ProxyError::Unreachable(_) => "Bad Gateway: Cannot connect to stream server".to_string(),
            other => format!("Bad Gateway: {}", other),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else if err.is_connect() {
            ProxyError::Unreachable(err.to_string())
        } else {
            ProxyError::Upstream(err.to_string())
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), self.client_message()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, ProxyError>;
