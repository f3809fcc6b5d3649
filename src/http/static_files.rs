//! Static file delegate.
//!
//! Everything the router does not proxy is served from the configured root
//! by `tower_http`'s `ServeDir`, which also enforces the `404` and
//! no-traversal rules. The only local policy is mapping `/` to the entry
//! document.

use axum::body::Body;
use axum::extract::Request;
use axum::http::Uri;
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::StaticConfig;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    dir: ServeDir,
    index_uri: String,
}

impl StaticFiles {
    pub fn new(config: &StaticConfig) -> Self {
        Self {
            dir: ServeDir::new(&config.root).append_index_html_on_directories(false),
            index_uri: format!("/{}", config.index),
        }
    }

    pub async fn serve(&self, mut request: Request) -> Response {
        if request.uri().path() == "/" {
            let target = match request.uri().query() {
                Some(query) => format!("{}?{}", self.index_uri, query),
                None => self.index_uri.clone(),
            };
            match target.parse::<Uri>() {
                Ok(uri) => *request.uri_mut() = uri,
                Err(e) => tracing::warn!(index = %self.index_uri, error = %e, "Entry document is not a valid URI"),
            }
        }

        match self.dir.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}
