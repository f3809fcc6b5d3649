//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the single dispatch handler
//! - Wire up middleware (tracing, request ID, fixed response headers)
//! - Dispatch requests: preflight, proxy engine, or static files
//! - Serve on a listener until shutdown is signalled
//!
//! # Design Decisions
//! - One task per connection (axum default); handlers share no mutable state
//! - Routing is decided by `RequestRouter`, not by axum path patterns, so
//!   query strings and odd paths reach the proxy untouched

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::static_files::StaticFiles;
use crate::proxy::{ProxyEngine, ProxyError};
use crate::routing::{RequestRouter, Route};
use crate::security::headers::with_fixed_headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub engine: Arc<ProxyEngine>,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(config: &RelayConfig) -> Result<Self, ProxyError> {
        Ok(Self {
            router: Arc::new(RequestRouter::new(config.upstream.path_prefix.clone())),
            engine: Arc::new(ProxyEngine::new(&config.upstream)?),
            static_files: StaticFiles::new(&config.static_files),
        })
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &RelayConfig) -> Result<Router, ProxyError> {
    let state = AppState::new(config)?;

    let router = Router::new().fallback(dispatch).with_state(state);

    Ok(with_fixed_headers(router)
        .layer(propagate_request_id_layer())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id()
                )
            }),
        )
        .layer(set_request_id_layer()))
}

/// HTTP server for the stream relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ProxyError> {
        let router = build_router(&config)?;
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.upstream.origin,
            prefix = %self.config.upstream.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point for every request.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let route = state.router.classify(request.method(), request.uri().path());

    match route {
        Route::Preflight => StatusCode::OK.into_response(),
        Route::Proxy if matches!(*request.method(), Method::GET | Method::HEAD) => {
            let method = request.method().clone();
            let uri = request.uri().clone();
            state.engine.handle(&method, &uri).await
        }
        Route::Proxy => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Method not allowed on proxied path"
            );
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, HEAD, OPTIONS")],
            )
                .into_response()
        }
        Route::Static => state.static_files.serve(request).await,
    }
}
