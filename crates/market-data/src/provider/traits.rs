//! Quote provider trait definition.

use async_trait::async_trait;

use super::capabilities::RateLimit;
use crate::chart::ChartRequest;
use crate::errors::MarketDataError;
use crate::provider::yahoo::models::{YahooChartResult, YahooQuote, YahooQuoteSummaryResult};

/// A source of quotes, intraday/historical charts and company fundamentals.
///
/// Implementations return `Ok(None)` (or an empty vector) when the upstream
/// answered but had nothing for the symbol, and `Err` when the request
/// itself failed. Services decide which of the two is fatal.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Unique identifier for this provider, used in logs.
    fn id(&self) -> &'static str;

    /// Pacing for batched quote requests.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch quotes for a batch of symbols in one request.
    async fn quotes(&self, symbols: &[String]) -> Result<Vec<YahooQuote>, MarketDataError>;

    /// Fetch the quote for a single symbol.
    async fn quote(&self, symbol: &str) -> Result<Option<YahooQuote>, MarketDataError> {
        let quotes = self.quotes(&[symbol.to_string()]).await?;
        Ok(quotes.into_iter().next())
    }

    /// Fetch a price series for the given window and interval.
    async fn chart(
        &self,
        symbol: &str,
        request: &ChartRequest,
    ) -> Result<Option<YahooChartResult>, MarketDataError>;

    /// Fetch price, summary detail, profile, financial data and key statistics.
    async fn quote_summary(
        &self,
        symbol: &str,
    ) -> Result<Option<YahooQuoteSummaryResult>, MarketDataError>;
}
