//! Price series for the chart endpoint.
//!
//! The series comes from the first strategy that produces at least one
//! point:
//!
//! 1. Yahoo chart API, attempted twice.
//! 2. A synthetic path built from the latest quote: a straight line from
//!    the previous close to the current price with small uniform noise,
//!    clamped to the day's high/low.
//!
//! When both fail the caller gets `None` and answers with an empty series.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use stockhero_core::cache::Clock;
use stockhero_core::fallback::FallbackChain;
use stockhero_core::utils::time_utils::{date_days_ago, midnight_unix, to_iso_string};
use tracing::{info, warn};

use crate::errors::MarketDataError;
use crate::provider::yahoo::models::{YahooChartResult, YahooQuote};
use crate::provider::QuoteSource;

/// Granularity label for series produced from a quote.
pub const INTERPOLATED: &str = "interpolated";

/// Supported chart windows. Unknown values behave like one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    OneDay,
    FiveDays,
    OneMonth,
    SixMonths,
    YearToDate,
    OneYear,
    FiveYears,
    Max,
}

impl ChartRange {
    /// Parse a range parameter case-insensitively.
    pub fn from_param(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "5D" => Self::FiveDays,
            "1M" => Self::OneMonth,
            "6M" => Self::SixMonths,
            "YTD" => Self::YearToDate,
            "1Y" => Self::OneYear,
            "5Y" => Self::FiveYears,
            "MAX" => Self::Max,
            _ => Self::OneDay,
        }
    }

    /// Upstream bar interval for this window.
    pub fn interval(&self) -> &'static str {
        match self {
            Self::OneDay => "5m",
            Self::FiveDays => "15m",
            Self::OneMonth => "60m",
            Self::SixMonths | Self::YearToDate | Self::OneYear => "1d",
            Self::FiveYears => "1wk",
            Self::Max => "1mo",
        }
    }

    /// First calendar day (UTC) of the window.
    pub fn start_date(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::OneDay => date_days_ago(now, 1),
            Self::FiveDays => date_days_ago(now, 5),
            Self::OneMonth => date_days_ago(now, 30),
            Self::SixMonths => date_days_ago(now, 180),
            Self::YearToDate => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .unwrap_or_else(|| date_days_ago(now, 365)),
            Self::OneYear => date_days_ago(now, 365),
            Self::FiveYears => date_days_ago(now, 365 * 5),
            Self::Max => NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        }
    }

    /// Upstream request parameters for this window ending at `now`.
    pub fn request(&self, now: DateTime<Utc>) -> ChartRequest {
        ChartRequest {
            period1: midnight_unix(self.start_date(now)),
            period2: now.timestamp(),
            interval: self.interval(),
        }
    }

    /// Number of points in a synthetic series.
    fn synthetic_points(&self) -> usize {
        match self {
            Self::OneDay => 30,
            _ => 50,
        }
    }

    /// Spacing between synthetic points.
    fn synthetic_spacing(&self) -> Duration {
        match self {
            Self::FiveDays => Duration::minutes(60 * 4),
            Self::OneMonth => Duration::minutes(60 * 24),
            _ => Duration::minutes(30),
        }
    }
}

/// Parameters of a chart request: unix seconds window and bar interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub period1: i64,
    pub period2: i64,
    pub interval: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
}

/// A chronologically ordered price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub symbol: String,
    pub currency: String,
    pub granularity: String,
    pub range: String,
    pub quotes: Vec<ChartPoint>,
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl ChartSeries {
    /// Convert a Yahoo chart result. Each point uses the close, else the
    /// open; points with neither are dropped.
    pub fn from_yahoo(
        result: YahooChartResult,
        symbol: &str,
        range_label: &str,
        range: ChartRange,
    ) -> Self {
        let meta = result.meta.unwrap_or_default();
        let columns = result
            .indicators
            .and_then(|indicators| indicators.quote.into_iter().next())
            .unwrap_or_default();

        let quotes = result
            .timestamp
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let close = truthy(columns.close.get(i).copied().flatten());
                let open = truthy(columns.open.get(i).copied().flatten());
                let price = close.or(open)?;
                let date = DateTime::<Utc>::from_timestamp(ts, 0)?;
                Some(ChartPoint {
                    date: to_iso_string(&date),
                    price,
                })
            })
            .collect();

        Self {
            symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
            currency: meta.currency.unwrap_or_else(|| "USD".to_string()),
            granularity: range.interval().to_string(),
            range: range_label.to_string(),
            quotes,
        }
    }
}

/// Build a plausible series from a single quote.
///
/// Returns `None` when the quote has no usable price.
pub fn synthesize_from_quote<R: Rng>(
    quote: &YahooQuote,
    symbol: &str,
    range_label: &str,
    range: ChartRange,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<ChartSeries> {
    let current = truthy(quote.regular_market_price)?;
    let prev_close = truthy(quote.regular_market_previous_close)
        .or(truthy(quote.previous_close))
        .unwrap_or(current);
    let high = truthy(quote.regular_market_day_high).unwrap_or(current * 1.01);
    let low = truthy(quote.regular_market_day_low).unwrap_or(current * 0.99);

    let points = range.synthetic_points();
    let spacing = range.synthetic_spacing();
    let volatility = (high - low) / current;

    let quotes = (0..points)
        .map(|i| {
            let progress = i as f64 / (points - 1) as f64;
            let trend = prev_close + (current - prev_close) * progress;
            let noise = trend * ((rng.gen::<f64>() - 0.5) * volatility * 0.3);
            let price = (trend + noise).max(low).min(high);
            let offset = spacing * (points - 1 - i) as i32;
            ChartPoint {
                date: to_iso_string(&(now - offset)),
                price: (price * 100.0).round() / 100.0,
            }
        })
        .collect();

    Some(ChartSeries {
        symbol: symbol.to_string(),
        currency: quote.currency.clone().unwrap_or_else(|| "USD".to_string()),
        granularity: INTERPOLATED.to_string(),
        range: range_label.to_string(),
        quotes,
    })
}

/// Resolves chart series through the fallback chain.
pub struct ChartService {
    source: Arc<dyn QuoteSource>,
    clock: Arc<dyn Clock>,
}

impl ChartService {
    pub fn new(source: Arc<dyn QuoteSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Best-effort series for `symbol`; `None` when every strategy failed.
    pub async fn series(&self, symbol: &str, range_label: &str) -> Option<ChartSeries> {
        let range = ChartRange::from_param(range_label);
        let now = self.clock.now();
        let request = range.request(now);
        let request = &request;
        let source = self.source.as_ref();

        let resolved = FallbackChain::<ChartSeries, MarketDataError>::new(format!("chart {}", symbol))
            .accept_if(|series| !series.quotes.is_empty())
            .step_with_attempts("chart", 2, move || async move {
                let result = source.chart(symbol, request).await?;
                Ok(result.map(|r| ChartSeries::from_yahoo(r, symbol, range_label, range)))
            })
            .step("quote-interpolation", move || async move {
                let quote = source.quote(symbol).await?;
                Ok(quote.and_then(|q| {
                    synthesize_from_quote(&q, symbol, range_label, range, now, &mut rand::thread_rng())
                }))
            })
            .run()
            .await;

        match resolved {
            Some(resolved) => {
                info!(
                    "Chart for {} resolved via {} ({} points)",
                    symbol,
                    resolved.strategy,
                    resolved.value.quotes.len()
                );
                Some(resolved.value)
            }
            None => {
                warn!("All chart strategies failed for {}", symbol);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::yahoo::models::{YahooChartMeta, YahooChartQuote, YahooIndicators};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_range_table() {
        let cases = [
            ("1d", "5m", "2024-06-14"),
            ("5D", "15m", "2024-06-10"),
            ("1M", "60m", "2024-05-16"),
            ("6M", "1d", "2023-12-18"),
            ("YTD", "1d", "2024-01-01"),
            ("1Y", "1d", "2023-06-16"),
            ("5Y", "1wk", "2019-06-17"),
            ("MAX", "1mo", "2000-01-01"),
            ("bogus", "5m", "2024-06-14"),
        ];
        for (param, interval, start) in cases {
            let range = ChartRange::from_param(param);
            assert_eq!(range.interval(), interval, "interval for {}", param);
            assert_eq!(range.start_date(now()).to_string(), start, "start for {}", param);
        }
    }

    #[test]
    fn test_request_uses_midnight_utc() {
        let request = ChartRange::Max.request(now());
        assert_eq!(request.period1, 946_684_800);
        assert_eq!(request.period2, now().timestamp());
        assert_eq!(request.interval, "1mo");
    }

    #[test]
    fn test_from_yahoo_prefers_close_and_drops_empty_points() {
        let result = YahooChartResult {
            meta: Some(YahooChartMeta {
                symbol: Some("1120.SR".to_string()),
                currency: Some("SAR".to_string()),
            }),
            timestamp: Some(vec![1_718_000_000, 1_718_000_300, 1_718_000_600]),
            indicators: Some(YahooIndicators {
                quote: vec![YahooChartQuote {
                    open: vec![Some(80.0), Some(80.5), None],
                    close: vec![Some(80.2), Some(0.0), None],
                }],
            }),
        };

        let series = ChartSeries::from_yahoo(result, "1120.sr", "1D", ChartRange::OneDay);
        assert_eq!(series.symbol, "1120.SR");
        assert_eq!(series.currency, "SAR");
        assert_eq!(series.granularity, "5m");
        assert_eq!(series.quotes.len(), 2);
        assert_eq!(series.quotes[0].price, 80.2);
        // Zero close falls back to the open
        assert_eq!(series.quotes[1].price, 80.5);
        assert_eq!(series.quotes[0].date, "2024-06-10T06:13:20.000Z");
    }

    #[test]
    fn test_from_yahoo_defaults_symbol_and_currency() {
        let series = ChartSeries::from_yahoo(YahooChartResult::default(), "TSLA", "5D", ChartRange::FiveDays);
        assert_eq!(series.symbol, "TSLA");
        assert_eq!(series.currency, "USD");
        assert!(series.quotes.is_empty());
    }

    #[test]
    fn test_synthetic_series_is_bounded_and_ordered() {
        let quote = YahooQuote {
            regular_market_price: Some(100.0),
            regular_market_previous_close: Some(98.0),
            regular_market_day_high: Some(101.0),
            regular_market_day_low: Some(97.5),
            currency: Some("SAR".to_string()),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let series =
            synthesize_from_quote(&quote, "2222.SR", "1D", ChartRange::OneDay, now(), &mut rng).unwrap();

        assert_eq!(series.granularity, INTERPOLATED);
        assert_eq!(series.currency, "SAR");
        assert_eq!(series.quotes.len(), 30);
        for point in &series.quotes {
            assert!(point.price >= 97.5 && point.price <= 101.0, "{} out of bounds", point.price);
        }
        assert!(series.quotes.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series.quotes.last().unwrap().date, to_iso_string(&now()));
        assert_eq!(
            series.quotes.first().unwrap().date,
            to_iso_string(&(now() - Duration::minutes(30 * 29)))
        );
    }

    #[test]
    fn test_synthetic_series_uses_defaults_for_missing_fields() {
        let quote = YahooQuote {
            regular_market_price: Some(50.0),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let series =
            synthesize_from_quote(&quote, "X", "1M", ChartRange::OneMonth, now(), &mut rng).unwrap();
        assert_eq!(series.quotes.len(), 50);
        assert_eq!(series.currency, "USD");
        for point in &series.quotes {
            assert!(point.price >= 49.5 && point.price <= 50.5);
        }
        assert_eq!(
            series.quotes.first().unwrap().date,
            to_iso_string(&(now() - Duration::days(49)))
        );
    }

    #[test]
    fn test_synthetic_series_requires_price() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(synthesize_from_quote(
            &YahooQuote::default(),
            "X",
            "1D",
            ChartRange::OneDay,
            now(),
            &mut rng
        )
        .is_none());
    }
}
