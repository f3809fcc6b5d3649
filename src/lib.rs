//! HLS stream relay library.
//!
//! Serves a local player page and forwards `/livelan/...` requests to a
//! private streaming origin, rewriting absolute origin URLs inside M3U8
//! playlists so players keep coming back through the relay.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod security;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
