//! Error types for the market data crate.

use stockhero_core::Error as CoreError;
use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider has no record of the requested symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider returned nothing usable.
    #[error("No data for {0}")]
    NoData(String),

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// Transport, status or decoding failure talking to the upstream.
    #[error(transparent)]
    Upstream(#[from] CoreError),
}

impl MarketDataError {
    /// Whether the upstream answered at all (non-OK status included).
    ///
    /// Handlers distinguish "the provider refused" (500) from
    /// "the provider answered with no rows" (404).
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::ProviderError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "quote endpoint returned no body".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - quote endpoint returned no body"
        );
    }

    #[test]
    fn test_upstream_status_is_transparent() {
        let error: MarketDataError = CoreError::UpstreamStatus {
            upstream: "YAHOO".to_string(),
            status: 429,
        }
        .into();
        assert_eq!(error.to_string(), "YAHOO returned HTTP 429");
        assert!(error.is_upstream_failure());
        assert!(!MarketDataError::NoData("AAPL".into()).is_upstream_failure());
    }
}
