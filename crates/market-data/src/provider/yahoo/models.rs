//! Yahoo Finance API response models.
//!
//! Three endpoints are consumed: v7 `quote`, v8 `chart` and v11
//! `quoteSummary`. Everything is optional because Yahoo omits fields
//! freely, especially for indices and non-US listings.

use serde::{Deserialize, Deserializer};

// ============================================================================
// v7 quote
// ============================================================================

/// Response wrapper for the v7 quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteResponse {
    pub quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteResult {
    #[serde(default)]
    pub result: Option<Vec<YahooQuote>>,
}

/// A single quote row from the v7 quote API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuote {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub sector: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub previous_close: Option<f64>,
    #[serde(rename = "averageDailyVolume3Month")]
    pub average_daily_volume_3_month: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub trailing_annual_dividend_yield: Option<f64>,
}

// ============================================================================
// v8 chart
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooChartResult {
    pub meta: Option<YahooChartMeta>,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<YahooIndicators>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooChartQuote>,
}

/// OHLC columns; individual points are `null` when the market was closed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

// ============================================================================
// v11 quoteSummary
// ============================================================================

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub summary_profile: Option<YahooSummaryProfile>,
    pub financial_data: Option<YahooFinancialData>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
}

/// Numeric value as returned by quoteSummary.
///
/// Yahoo sends `{"raw": 1.5, "fmt": "1.50"}`, an empty object when there
/// is no data, and occasionally a bare number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}

impl<'de> Deserialize<'de> for YahooPriceDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawOrNumber {
            Number(f64),
            Wrapped {
                #[serde(default)]
                raw: Option<f64>,
            },
        }

        Ok(match RawOrNumber::deserialize(deserializer)? {
            RawOrNumber::Number(raw) => Self { raw: Some(raw) },
            RawOrNumber::Wrapped { raw } => Self { raw },
        })
    }
}

/// Read the raw value out of an optional detail.
pub fn raw(detail: &Option<YahooPriceDetail>) -> Option<f64> {
    detail.as_ref().and_then(|d| d.raw)
}

/// Price data from quoteSummary API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_change: Option<YahooPriceDetail>,
    pub regular_market_change_percent: Option<YahooPriceDetail>,
}

/// Summary detail data (trading and valuation metrics)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub previous_close: Option<YahooPriceDetail>,
    pub open: Option<YahooPriceDetail>,
    pub day_high: Option<YahooPriceDetail>,
    pub day_low: Option<YahooPriceDetail>,
    pub volume: Option<YahooPriceDetail>,
    pub average_volume: Option<YahooPriceDetail>,
    pub fifty_two_week_high: Option<YahooPriceDetail>,
    pub fifty_two_week_low: Option<YahooPriceDetail>,
    pub fifty_day_average: Option<YahooPriceDetail>,
    pub two_hundred_day_average: Option<YahooPriceDetail>,
    pub beta: Option<YahooPriceDetail>,
    pub market_cap: Option<YahooPriceDetail>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooPriceDetail>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooPriceDetail>,
    pub dividend_yield: Option<YahooPriceDetail>,
    pub trailing_annual_dividend_yield: Option<YahooPriceDetail>,
}

/// Summary profile data (company info)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFinancialData {
    pub profit_margins: Option<YahooPriceDetail>,
    pub return_on_equity: Option<YahooPriceDetail>,
    pub total_revenue: Option<YahooPriceDetail>,
    pub revenue_growth: Option<YahooPriceDetail>,
    pub target_mean_price: Option<YahooPriceDetail>,
    pub number_of_analyst_opinions: Option<YahooPriceDetail>,
    pub recommendation_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub price_to_book: Option<YahooPriceDetail>,
    pub trailing_eps: Option<YahooPriceDetail>,
    pub forward_eps: Option<YahooPriceDetail>,
    pub shares_outstanding: Option<YahooPriceDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_price_detail() {
        let json = r#"{"raw": 150.25, "fmt": "150.25"}"#;
        let detail: YahooPriceDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.raw, Some(150.25));
    }

    #[test]
    fn test_deserialize_price_detail_empty_object() {
        let detail: YahooPriceDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(detail.raw, None);
    }

    #[test]
    fn test_deserialize_price_detail_bare_number() {
        let detail: YahooPriceDetail = serde_json::from_str("12").unwrap();
        assert_eq!(detail.raw, Some(12.0));
    }

    #[test]
    fn test_deserialize_quote_response() {
        let json = r#"{
            "quoteResponse": {
                "result": [{
                    "symbol": "2222.SR",
                    "shortName": "Saudi Arabian Oil Co.",
                    "currency": "SAR",
                    "regularMarketPrice": 27.9,
                    "regularMarketChangePercent": -0.35,
                    "regularMarketVolume": 12000000,
                    "averageDailyVolume3Month": 15000000,
                    "trailingPE": 16.4
                }],
                "error": null
            }
        }"#;
        let response: YahooQuoteResponse = serde_json::from_str(json).unwrap();
        let quotes = response.quote_response.result.unwrap();
        assert_eq!(quotes.len(), 1);
        let quote = &quotes[0];
        assert_eq!(quote.symbol.as_deref(), Some("2222.SR"));
        assert_eq!(quote.regular_market_volume, Some(12_000_000.0));
        assert_eq!(quote.average_daily_volume_3_month, Some(15_000_000.0));
        assert_eq!(quote.trailing_pe, Some(16.4));
        assert_eq!(quote.regular_market_change, None);
    }

    #[test]
    fn test_deserialize_chart_with_null_points() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "currency": "USD"},
                    "timestamp": [1709290800, 1709291100],
                    "indicators": {"quote": [{"open": [180.1, null], "close": [null, 180.4]}]}
                }],
                "error": null
            }
        }"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        let result = &response.chart.result.unwrap()[0];
        let quote = &result.indicators.as_ref().unwrap().quote[0];
        assert_eq!(quote.open, vec![Some(180.1), None]);
        assert_eq!(quote.close, vec![None, Some(180.4)]);
    }

    #[test]
    fn test_deserialize_summary_modules() {
        let json = r#"{
            "price": {"shortName": "Apple Inc.", "exchange": "NMS", "regularMarketPrice": {"raw": 190.5, "fmt": "190.50"}},
            "summaryDetail": {"trailingPE": {"raw": 29.1}, "dividendYield": {}},
            "financialData": {"recommendationKey": "buy", "numberOfAnalystOpinions": {"raw": 38}},
            "defaultKeyStatistics": {"sharesOutstanding": {"raw": 15500000000}}
        }"#;
        let result: YahooQuoteSummaryResult = serde_json::from_str(json).unwrap();
        let price = result.price.as_ref().unwrap();
        assert_eq!(raw(&price.regular_market_price), Some(190.5));
        let detail = result.summary_detail.as_ref().unwrap();
        assert_eq!(raw(&detail.trailing_pe), Some(29.1));
        assert_eq!(raw(&detail.dividend_yield), None);
        let financial = result.financial_data.as_ref().unwrap();
        assert_eq!(financial.recommendation_key.as_deref(), Some("buy"));
        assert!(result.summary_profile.is_none());
    }
}
