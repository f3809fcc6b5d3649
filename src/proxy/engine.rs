//! Upstream forwarding for stream-prefixed requests.
//!
//! # Responsibilities
//! - Build the upstream URL from the origin and the untouched request path
//! - Issue one GET with bounded connect/read timeouts
//! - Answer HEAD with the headers a GET would produce and no body
//! - Rewrite and buffer playlists, stream everything else
//! - Map failures to 502/504 at the request boundary
//!
//! # Design Decisions
//! - The client status code is the upstream status code, verbatim
//! - `Content-Length` is only ever set for rewritten playlists
//! - No retries: players reissue requests on their own schedule
//! - HEAD on a playlist still fetches it upstream, since its
//!   `Content-Length` is only known after rewriting; HEAD on anything else
//!   is sent upstream as HEAD

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Method, Uri};
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::proxy::error::{ProxyError, Result};
use crate::proxy::rewrite::{is_playlist, PlaylistRewriter};
use crate::proxy::stream::SegmentStream;
use crate::security::headers::copy_upstream_headers;

/// Forwards requests to the single configured origin.
#[derive(Debug, Clone)]
pub struct ProxyEngine {
    client: Client,
    origin: String,
    chunk_size: usize,
    timeout: Duration,
    rewriter: PlaylistRewriter,
}

impl ProxyEngine {
    /// Create an engine for the given upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ProxyError::Client(e.to_string()))?;

        Ok(Self {
            client,
            origin: config.origin.clone(),
            chunk_size: config.chunk_size,
            timeout,
            rewriter: PlaylistRewriter::new(&config.origin, &config.path_prefix)?,
        })
    }

    /// Upstream URL for a request path (query included), authority swapped.
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.origin, path_and_query)
    }

    /// Proxy one GET or HEAD request. Never fails: errors become 502/504
    /// responses.
    pub async fn handle(&self, method: &Method, uri: &Uri) -> Response {
        let start = Instant::now();
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        let target = self.target_url(path_and_query);
        let kind = if is_playlist(uri.path()) { "playlist" } else { "segment" };

        let head_only = *method == Method::HEAD;

        tracing::info!(target_url = %target, kind, method = %method, "Proxying request");

        match self.forward(&target, uri.path(), head_only).await {
            Ok(response) => {
                metrics::record_request(kind, response.status().as_u16(), start);
                response
            }
            Err(e) => {
                match &e {
                    ProxyError::Timeout => {
                        tracing::error!(target_url = %target, "Upstream request timed out")
                    }
                    ProxyError::Unreachable(detail) => tracing::error!(
                        target_url = %target,
                        error = %detail,
                        "Cannot connect to stream server"
                    ),
                    other => tracing::error!(target_url = %target, error = %other, "Proxy failure"),
                }
                metrics::record_request(kind, e.status_code().as_u16(), start);
                metrics::record_failure(e.category());
                e.into_response()
            }
        }
    }

    /// Fetch `target` and build the client response.
    ///
    /// `path` is the request path without query, used for classification.
    /// With `head_only` the response carries no body.
    pub async fn forward(&self, target: &str, path: &str, head_only: bool) -> Result<Response> {
        let url = Url::parse(target).map_err(|source| ProxyError::InvalidTarget {
            target: target.to_string(),
            source,
        })?;

        let playlist = is_playlist(path);
        let method = if head_only && !playlist {
            Method::HEAD
        } else {
            Method::GET
        };

        let upstream = tokio::time::timeout(self.timeout, self.client.request(method, url).send())
            .await
            .map_err(|_| ProxyError::Timeout)??;

        let mut builder = Response::builder().status(upstream.status());
        if let Some(headers) = builder.headers_mut() {
            copy_upstream_headers(upstream.headers(), headers);
        }

        if playlist {
            let raw = upstream.bytes().await?;
            let text = String::from_utf8(raw.to_vec())?;
            let body = self.rewriter.rewrite(&text).into_owned().into_bytes();

            tracing::info!(target_url = %target, bytes = body.len(), "Rewrote playlist");
            metrics::record_playlist_rewrite();

            let builder = builder.header(header::CONTENT_LENGTH, body.len());
            if head_only {
                Ok(builder.body(Body::empty())?)
            } else {
                Ok(builder.body(Body::from(body))?)
            }
        } else if head_only {
            Ok(builder.body(Body::empty())?)
        } else {
            let stream = SegmentStream::new(upstream.bytes_stream(), self.chunk_size, target);
            Ok(builder.body(Body::from_stream(stream))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProxyEngine {
        ProxyEngine::new(&UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn target_keeps_path_and_query_verbatim() {
        let engine = engine();
        assert_eq!(
            engine.target_url("/livelan/live.m3u8"),
            "http://192.168.6.200:8088/livelan/live.m3u8"
        );
        assert_eq!(
            engine.target_url("/livelan/seg%201.ts?token=a%2Fb&x=1"),
            "http://192.168.6.200:8088/livelan/seg%201.ts?token=a%2Fb&x=1"
        );
    }

    #[tokio::test]
    async fn invalid_origin_is_bad_gateway() {
        let config = UpstreamConfig {
            origin: "bad host:port".into(),
            ..UpstreamConfig::default()
        };
        let engine = ProxyEngine::new(&config).unwrap();
        let response = engine
            .handle(&Method::GET, &Uri::from_static("/livelan/live.m3u8"))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
