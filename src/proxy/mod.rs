//! Proxy engine subsystem.
//!
//! # Data Flow
//! ```text
//! Stream-prefixed request
//!     → engine.rs (target URL, single upstream GET)
//!     → *.m3u8: rewrite.rs (origin URLs → proxy prefix), buffered, Content-Length set
//!     → other:  stream.rs (chunked passthrough, no Content-Length)
//!     → error.rs (timeout → 504, everything else → 502)
//! ```

pub mod engine;
pub mod error;
pub mod rewrite;
pub mod stream;

pub use engine::ProxyEngine;
pub use error::ProxyError;
pub use rewrite::PlaylistRewriter;
