//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (classify)
//!     → matcher.rs (evaluate the proxy prefix)
//!     → Return: Preflight | Proxy | Static
//! ```
//!
//! # Design Decisions
//! - Router built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same route
//! - The router only decides; handlers live in `http` and `proxy`

pub mod matcher;
pub mod router;

pub use router::{RequestRouter, Route};
