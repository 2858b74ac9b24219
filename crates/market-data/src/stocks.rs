//! Market overview list: batched quotes mapped to display summaries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockhero_core::utils::time_utils::to_iso_string;
use tracing::{debug, warn};

use crate::provider::yahoo::models::YahooQuote;
use crate::provider::QuoteSource;
use crate::universe::{logo_url, ticker_meta, tickers_for_market, MarketCategory};

/// One row of the stocks list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub symbol: String,
    pub name: String,
    pub category: String,
    pub country: String,
    pub sector: Option<String>,
    pub logo: Option<String>,
    pub price: f64,
    pub regular_market_price: f64,
    pub change: f64,
    pub regular_market_change: f64,
    pub change_percent: f64,
    pub regular_market_change_percent: f64,
    pub prev_close: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    pub last_updated: String,
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// Map a raw quote to a summary row. Quotes without a symbol are dropped.
///
/// When the upstream change is missing or zero but both prices are known,
/// change and percentage are recomputed from the previous close.
pub fn map_stock_summary(quote: &YahooQuote, now: DateTime<Utc>) -> Option<StockSummary> {
    let symbol = non_empty(&quote.symbol)?;
    let category = MarketCategory::of(&symbol);
    let meta = ticker_meta(&symbol);

    let price = truthy(quote.regular_market_price)
        .or(truthy(quote.regular_market_open))
        .or(truthy(quote.previous_close))
        .unwrap_or(0.0);
    let prev_close = truthy(quote.regular_market_previous_close)
        .or(truthy(quote.previous_close))
        .unwrap_or(price);

    let mut change = quote.regular_market_change;
    let mut change_percent = quote.regular_market_change_percent;
    if matches!(change, None | Some(0.0)) && prev_close > 0.0 && price > 0.0 {
        let delta = price - prev_close;
        change = Some(delta);
        change_percent = Some(delta / prev_close * 100.0);
    }
    let change = truthy(change).unwrap_or(0.0);
    let change_percent = truthy(change_percent).unwrap_or(0.0);

    let name = meta
        .map(|m| m.name.to_string())
        .or_else(|| non_empty(&quote.short_name))
        .or_else(|| non_empty(&quote.long_name))
        .unwrap_or_else(|| symbol.clone());
    let country = meta
        .map(|m| m.country)
        .unwrap_or_else(|| category.default_flag())
        .to_string();
    let sector = meta
        .map(|m| m.sector.to_string())
        .or_else(|| non_empty(&quote.sector));

    Some(StockSummary {
        logo: logo_url(&symbol),
        name,
        category: category.code().to_string(),
        country,
        sector,
        price,
        regular_market_price: price,
        change,
        regular_market_change: change,
        change_percent,
        regular_market_change_percent: change_percent,
        prev_close,
        volume: truthy(quote.regular_market_volume)
            .or(truthy(quote.average_daily_volume_3_month))
            .unwrap_or(0.0),
        market_cap: quote.market_cap,
        pe_ratio: quote.trailing_pe,
        dividend_yield: quote.trailing_annual_dividend_yield,
        last_updated: to_iso_string(&now),
        symbol,
    })
}

/// Fetches the configured universe for a market in paced batches.
pub struct StockListService {
    source: Arc<dyn QuoteSource>,
}

impl StockListService {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Quotes for every ticker of `market`. A failing batch is logged and
    /// skipped so the rest of the list still renders.
    pub async fn list(&self, market: Option<&str>) -> Vec<StockSummary> {
        let tickers = tickers_for_market(market);
        let limit = self.source.rate_limit();
        let batch_size = limit.max_symbols_per_request.max(1);
        let batches: Vec<Vec<String>> = tickers
            .chunks(batch_size)
            .map(|chunk| chunk.iter().map(|s| s.to_string()).collect())
            .collect();

        let mut quotes = Vec::with_capacity(tickers.len());
        for (index, batch) in batches.iter().enumerate() {
            match self.source.quotes(batch).await {
                Ok(mut rows) => {
                    debug!("Batch {} returned {} quotes", index, rows.len());
                    quotes.append(&mut rows);
                }
                Err(e) => warn!("Chunk fetch failed ({}): {}", self.source.id(), e),
            }
            if index + 1 < batches.len() {
                tokio::time::sleep(limit.min_delay).await;
            }
        }

        let now = Utc::now();
        quotes
            .iter()
            .filter_map(|quote| map_stock_summary(quote, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_map_known_saudi_ticker() {
        let quote = YahooQuote {
            symbol: Some("2222.SR".to_string()),
            short_name: Some("SAUDI ARABIAN OIL CO".to_string()),
            regular_market_price: Some(28.0),
            regular_market_change: Some(0.2),
            regular_market_change_percent: Some(0.72),
            regular_market_previous_close: Some(27.8),
            regular_market_volume: Some(1_000.0),
            market_cap: Some(6.8e12),
            ..Default::default()
        };
        let summary = map_stock_summary(&quote, now()).unwrap();
        assert_eq!(summary.name, "Saudi Aramco");
        assert_eq!(summary.category, "SA");
        assert_eq!(summary.sector.as_deref(), Some("Energy"));
        assert!(summary.logo.unwrap().contains("aramco.com"));
        assert_eq!(summary.change, 0.2);
        assert_eq!(summary.regular_market_change_percent, 0.72);
        assert_eq!(summary.market_cap, Some(6.8e12));
        assert_eq!(summary.last_updated, "2024-06-15T09:00:00.000Z");
    }

    #[test]
    fn test_change_recomputed_from_previous_close() {
        let quote = YahooQuote {
            symbol: Some("EAST.CA".to_string()),
            long_name: Some("Eastern Company".to_string()),
            regular_market_price: Some(22.0),
            regular_market_change: Some(0.0),
            previous_close: Some(20.0),
            average_daily_volume_3_month: Some(500.0),
            ..Default::default()
        };
        let summary = map_stock_summary(&quote, now()).unwrap();
        assert_eq!(summary.category, "EG");
        assert_eq!(summary.country, crate::universe::FLAG_EG);
        assert_eq!(summary.name, "Eastern Company");
        assert_eq!(summary.prev_close, 20.0);
        assert!((summary.change - 2.0).abs() < 1e-9);
        assert!((summary.change_percent - 10.0).abs() < 1e-9);
        assert_eq!(summary.volume, 500.0);
        assert!(summary.sector.is_none());
        assert!(summary.logo.is_none());
    }

    #[test]
    fn test_quote_without_symbol_is_dropped() {
        assert!(map_stock_summary(&YahooQuote::default(), now()).is_none());
    }

    #[test]
    fn test_optional_metrics_are_omitted_when_missing() {
        let quote = YahooQuote {
            symbol: Some("AMD".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(map_stock_summary(&quote, now()).unwrap()).unwrap();
        assert!(json.get("marketCap").is_none());
        assert!(json.get("peRatio").is_none());
        assert_eq!(json["sector"], serde_json::Value::Null);
        assert_eq!(json["price"], 0.0);
        assert_eq!(json["category"], "Global");
    }
}
