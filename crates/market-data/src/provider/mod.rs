//! Quote provider abstraction and the Yahoo Finance implementation.
//!
//! Services depend on [`QuoteSource`] only, so tests can substitute an
//! in-memory source and exercise every fallback path without a network.

mod capabilities;
mod traits;

pub mod yahoo;

// Re-exports
pub use capabilities::RateLimit;
pub use traits::QuoteSource;
