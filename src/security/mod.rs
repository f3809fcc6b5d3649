//! Response header policy.
//!
//! # Data Flow
//! ```text
//! Upstream response:
//!     → headers.rs (drop framing/encoding headers)
//! Every response:
//!     → headers.rs (CORS + no-cache, set exactly once)
//! ```
//!
//! # Design Decisions
//! - No authentication or rate limiting: the relay serves a trusted LAN
//! - CORS is wide open so any page can embed the player

pub mod headers;
