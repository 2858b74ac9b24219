//! Request pacing for a quote provider.

use std::time::Duration;

/// Rate limiting configuration for a provider.
///
/// Multi-symbol requests are split into batches of `max_symbols_per_request`
/// and issued sequentially with `min_delay` between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Maximum symbols per batched quote request.
    pub max_symbols_per_request: usize,

    /// Minimum delay between consecutive batched requests.
    pub min_delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_symbols_per_request: 10,
            min_delay: Duration::from_millis(50),
        }
    }
}
