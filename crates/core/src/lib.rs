//! Stock Hero Core - shared plumbing for the API layer.
//!
//! Every endpoint follows the same shape: fetch from an upstream source,
//! fall back to a secondary strategy when the primary yields nothing,
//! and keep a short-lived copy in a TTL cache. This crate holds the
//! pieces that shape needs:
//!
//! - [`http::UpstreamClient`] - shared `reqwest` client with a browser User-Agent
//! - [`fallback::FallbackChain`] - ordered strategies with per-step attempt counts
//! - [`cache::TtlCache`] - key/value store with a fixed TTL and an injectable [`cache::Clock`]
//! - [`utils`] - timestamp formatting shared by every JSON payload

pub mod cache;
pub mod errors;
pub mod fallback;
pub mod http;
pub mod utils;

pub use errors::Error;
pub use errors::Result;
