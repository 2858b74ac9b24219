//! Rule-based stock insight.
//!
//! No model is involved: momentum, valuation and the daily move are turned
//! into a short summary, a sentiment and a Buy/Hold/Sell call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stockhero_core::utils::time_utils::to_iso_string;
use stockhero_market_data::provider::yahoo::models::YahooQuote;

/// The quote fields the insight rules look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE", skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl StockSnapshot {
    /// Snapshot of `quote`, reported under the symbol the caller asked for.
    pub fn from_quote(symbol: &str, quote: &YahooQuote) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: quote.regular_market_price,
            change: quote.regular_market_change,
            change_percent: quote.regular_market_change_percent,
            sector: quote.sector.clone(),
            market_cap: quote.market_cap,
            trailing_pe: quote.trailing_pe,
            volume: quote.regular_market_volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub summary: String,
    pub sentiment: String,
    pub recommendation: String,
    pub confidence: u8,
    pub key_points: Vec<String>,
    pub generated_at: String,
}

fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

pub fn generate_insight(stock: &StockSnapshot, now: DateTime<Utc>) -> Insight {
    let symbol = &stock.symbol;
    let change_percent = stock.change_percent.unwrap_or(0.0);
    let move_size = change_percent.abs();
    let is_positive = stock.change.unwrap_or(0.0) >= 0.0;
    let direction = if is_positive { "up" } else { "down" };

    let (mut summary, mut confidence) = if move_size > 3.0 {
        (
            format!(
                "{} is showing significant {}ward momentum with a {:.2}% move. ",
                symbol, direction, move_size
            ),
            75,
        )
    } else if move_size > 1.0 {
        (
            format!("{} is experiencing moderate {}ward pressure today. ", symbol, direction),
            60,
        )
    } else {
        (
            format!("{} is trading relatively flat, indicating consolidation. ", symbol),
            50,
        )
    };

    if let Some(sector) = stock.sector.as_deref().filter(|s| !s.is_empty()) {
        summary.push_str(&format!(
            "As a {} stock, it may be influenced by sector-wide trends. ",
            sector
        ));
    }

    if let Some(pe) = truthy(stock.trailing_pe).filter(|pe| *pe > 0.0) {
        if pe > 25.0 {
            summary.push_str(&format!(
                "With a P/E of {:.1}, it's trading at a premium valuation. ",
                pe
            ));
        } else if pe < 15.0 {
            summary.push_str(&format!(
                "With a P/E of {:.1}, it appears reasonably valued. ",
                pe
            ));
        }
    }

    let mut recommendation = "Hold";
    if is_positive && change_percent > 2.0 {
        recommendation = "Buy";
        confidence = 70;
    } else if !is_positive && change_percent < -2.0 {
        recommendation = "Sell";
        confidence = 65;
    }

    let key_points = vec![
        format!(
            "Current price: {}",
            stock
                .price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "N/A".to_string())
        ),
        format!(
            "Daily change: {}%",
            stock
                .change_percent
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "0".to_string())
        ),
        format!(
            "Market cap: {}",
            truthy(stock.market_cap)
                .map(|cap| format!("{:.2}B", cap / 1e9))
                .unwrap_or_else(|| "N/A".to_string())
        ),
        format!(
            "P/E Ratio: {}",
            stock
                .trailing_pe
                .map(|pe| format!("{:.1}", pe))
                .unwrap_or_else(|| "N/A".to_string())
        ),
    ];

    Insight {
        summary,
        sentiment: if is_positive { "bullish" } else { "bearish" }.to_string(),
        recommendation: recommendation.to_string(),
        confidence,
        key_points,
        generated_at: to_iso_string(&now),
    }
}
