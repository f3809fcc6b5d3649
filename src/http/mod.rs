//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID)
//!     → routing (preflight / proxy / static)
//!     → proxy engine or static_files.rs
//!     → security::headers (CORS + no-cache on every response)
//!     → Send to client
//! ```

pub mod request;
pub mod server;
pub mod static_files;

pub use request::{MakeRelayRequestId, RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
pub use static_files::StaticFiles;
