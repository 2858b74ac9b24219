//! Extended stock profile assembled from quote + quoteSummary.
//!
//! Every output field is described by a [`FieldRule`]: an ordered list of
//! upstream sources and a fallback used when none of them holds a truthy
//! value (non-zero number, non-empty string).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use stockhero_core::utils::time_utils::to_iso_string;
use tracing::warn;

use crate::errors::MarketDataError;
use crate::provider::yahoo::models::{raw, YahooPriceDetail, YahooQuote, YahooQuoteSummaryResult};
use crate::provider::QuoteSource;
use crate::universe::{currency_for_symbol, known_name};

pub const PROFILE_SOURCE: &str = "yahoo-finance";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    fn into_json(self) -> Value {
        match self {
            FieldValue::Number(n) => Value::from(n),
            FieldValue::Text(s) => Value::String(s),
        }
    }
}

/// Where a field value can come from.
#[derive(Clone, Copy)]
pub enum Source {
    Quote(fn(&YahooQuote) -> Option<FieldValue>),
    Summary(fn(&YahooQuoteSummaryResult) -> Option<FieldValue>),
}

/// Value used when no source is truthy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Zero,
    Text(&'static str),
    Symbol,
    KnownNameOrSymbol,
    CurrencyBySuffix,
}

pub struct FieldRule {
    pub field: &'static str,
    pub sources: &'static [Source],
    pub fallback: Fallback,
}

fn number(value: Option<f64>) -> Option<FieldValue> {
    value.map(FieldValue::Number)
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value.clone().map(FieldValue::Text)
}

fn module_number<M>(
    module: &Option<M>,
    pick: impl FnOnce(&M) -> &Option<YahooPriceDetail>,
) -> Option<FieldValue> {
    module.as_ref().and_then(|m| number(raw(pick(m))))
}

fn module_text<M>(module: &Option<M>, pick: impl FnOnce(&M) -> &Option<String>) -> Option<FieldValue> {
    module.as_ref().and_then(|m| text(pick(m)))
}

/// Canonical profile fields in output order.
pub static PROFILE_RULES: &[FieldRule] = &[
    FieldRule {
        field: "symbol",
        sources: &[],
        fallback: Fallback::Symbol,
    },
    FieldRule {
        field: "shortName",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_text(&s.price, |p| &p.short_name)),
            Source::Quote(|q: &YahooQuote| text(&q.short_name)),
        ],
        fallback: Fallback::KnownNameOrSymbol,
    },
    FieldRule {
        field: "longName",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_text(&s.price, |p| &p.long_name)),
            Source::Quote(|q: &YahooQuote| text(&q.long_name)),
        ],
        fallback: Fallback::KnownNameOrSymbol,
    },
    FieldRule {
        field: "exchange",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_text(&s.price, |p| &p.exchange)),
            Source::Quote(|q: &YahooQuote| text(&q.exchange)),
        ],
        fallback: Fallback::Text("Unknown"),
    },
    FieldRule {
        field: "currency",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_text(&s.price, |p| &p.currency)),
            Source::Quote(|q: &YahooQuote| text(&q.currency)),
        ],
        fallback: Fallback::CurrencyBySuffix,
    },
    FieldRule {
        field: "price",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.price, |p| &p.regular_market_price)
            }),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_price)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "change",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.price, |p| &p.regular_market_change)
            }),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_change)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "changePercent",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.price, |p| &p.regular_market_change_percent)
            }),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_change_percent)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "prevClose",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.previous_close)
            }),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_previous_close)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "open",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_number(&s.summary_detail, |d| &d.open)),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_open)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "high",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.day_high)
            }),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_day_high)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "low",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_number(&s.summary_detail, |d| &d.day_low)),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_day_low)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "volume",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| module_number(&s.summary_detail, |d| &d.volume)),
            Source::Quote(|q: &YahooQuote| number(q.regular_market_volume)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "averageVolume",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.average_volume)
            }),
            Source::Quote(|q: &YahooQuote| number(q.average_daily_volume_3_month)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "fiftyTwoWeekHigh",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.fifty_two_week_high)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "fiftyTwoWeekLow",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.fifty_two_week_low)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "fiftyDayAverage",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.fifty_day_average)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "twoHundredDayAverage",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.two_hundred_day_average)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "beta",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.beta)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "marketCap",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.market_cap)
            }),
            Source::Quote(|q: &YahooQuote| number(q.market_cap)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "trailingPE",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.trailing_pe)
            }),
            Source::Quote(|q: &YahooQuote| number(q.trailing_pe)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "forwardPE",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.forward_pe)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "priceToBook",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.default_key_statistics, |k| &k.price_to_book)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "trailingEps",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.default_key_statistics, |k| &k.trailing_eps)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "forwardEps",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.default_key_statistics, |k| &k.forward_eps)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "profitMargins",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.profit_margins)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "returnOnEquity",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.return_on_equity)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "totalRevenue",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.total_revenue)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "revenueGrowth",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.revenue_growth)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "dividendYield",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.summary_detail, |d| &d.dividend_yield)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "trailingAnnualDividendYield",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_number(&s.summary_detail, |d| &d.trailing_annual_dividend_yield)
            }),
            Source::Quote(|q: &YahooQuote| number(q.trailing_annual_dividend_yield)),
        ],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "sharesOutstanding",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.default_key_statistics, |k| &k.shares_outstanding)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "targetMeanPrice",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.target_mean_price)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "numberOfAnalystOpinions",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_number(&s.financial_data, |f| &f.number_of_analyst_opinions)
        })],
        fallback: Fallback::Zero,
    },
    FieldRule {
        field: "recommendationKey",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_text(&s.financial_data, |f| &f.recommendation_key)
        })],
        fallback: Fallback::Text("none"),
    },
    FieldRule {
        field: "sector",
        sources: &[
            Source::Summary(|s: &YahooQuoteSummaryResult| {
                module_text(&s.summary_profile, |p| &p.sector)
            }),
            Source::Quote(|q: &YahooQuote| text(&q.sector)),
        ],
        fallback: Fallback::Text("Unknown"),
    },
    FieldRule {
        field: "industry",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_text(&s.summary_profile, |p| &p.industry)
        })],
        fallback: Fallback::Text("Unknown"),
    },
    FieldRule {
        field: "country",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_text(&s.summary_profile, |p| &p.country)
        })],
        fallback: Fallback::Text(""),
    },
    FieldRule {
        field: "website",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_text(&s.summary_profile, |p| &p.website)
        })],
        fallback: Fallback::Text(""),
    },
    FieldRule {
        field: "description",
        sources: &[Source::Summary(|s: &YahooQuoteSummaryResult| {
            module_text(&s.summary_profile, |p| &p.long_business_summary)
        })],
        fallback: Fallback::Text(""),
    },
];

impl FieldRule {
    /// First truthy source value, else the fallback.
    pub fn resolve(
        &self,
        symbol: &str,
        quote: Option<&YahooQuote>,
        summary: Option<&YahooQuoteSummaryResult>,
    ) -> FieldValue {
        self.sources
            .iter()
            .filter_map(|source| match source {
                Source::Quote(read) => quote.and_then(read),
                Source::Summary(read) => summary.and_then(read),
            })
            .find(FieldValue::is_truthy)
            .unwrap_or_else(|| self.fallback.value(symbol))
    }
}

impl Fallback {
    fn value(&self, symbol: &str) -> FieldValue {
        match self {
            Fallback::Zero => FieldValue::Number(0.0),
            Fallback::Text(s) => FieldValue::Text((*s).to_string()),
            Fallback::Symbol => FieldValue::Text(symbol.to_string()),
            Fallback::KnownNameOrSymbol => {
                FieldValue::Text(known_name(symbol).unwrap_or(symbol).to_string())
            }
            Fallback::CurrencyBySuffix => FieldValue::Text(currency_for_symbol(symbol).to_string()),
        }
    }
}

/// Profile payload, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StockProfile(pub Map<String, Value>);

impl StockProfile {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

pub fn build_profile(
    symbol: &str,
    quote: Option<&YahooQuote>,
    summary: Option<&YahooQuoteSummaryResult>,
    now: DateTime<Utc>,
) -> StockProfile {
    let mut fields = Map::new();
    for rule in PROFILE_RULES {
        let value = rule.resolve(symbol, quote, summary);
        fields.insert(rule.field.to_string(), value.into_json());
    }
    fields.insert("lastUpdated".to_string(), Value::String(to_iso_string(&now)));
    fields.insert("source".to_string(), Value::String(PROFILE_SOURCE.to_string()));
    StockProfile(fields)
}

pub struct ProfileService {
    source: Arc<dyn QuoteSource>,
}

impl ProfileService {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Fetch summary and quote concurrently. A failing call counts as
    /// absent; only both being absent is an error.
    pub async fn profile(&self, symbol: &str) -> Result<StockProfile, MarketDataError> {
        let (summary, quote) = tokio::join!(
            self.source.quote_summary(symbol),
            self.source.quote(symbol)
        );

        let summary = summary.unwrap_or_else(|e| {
            warn!("quoteSummary failed for {}: {}", symbol, e);
            None
        });
        let quote = quote.unwrap_or_else(|e| {
            warn!("Quote failed for {}: {}", symbol, e);
            None
        });

        if summary.is_none() && quote.is_none() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        Ok(build_profile(
            symbol,
            quote.as_ref(),
            summary.as_ref(),
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn summary() -> YahooQuoteSummaryResult {
        serde_json::from_str(
            r#"{
                "price": {"shortName": "Apple Inc.", "currency": "USD", "regularMarketPrice": {"raw": 0}},
                "summaryDetail": {"trailingPE": {"raw": 29.1}, "beta": 1.2, "previousClose": {}},
                "summaryProfile": {"sector": "Technology", "industry": "", "longBusinessSummary": "Phones."},
                "financialData": {"recommendationKey": "buy"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_wins_over_quote_when_truthy() {
        let quote = YahooQuote {
            short_name: Some("APPLE".to_string()),
            trailing_pe: Some(30.0),
            ..Default::default()
        };
        let profile = build_profile("AAPL", Some(&quote), Some(&summary()), now());
        assert_eq!(profile.get("shortName").unwrap(), "Apple Inc.");
        assert_eq!(profile.get("trailingPE").unwrap(), 29.1);
        assert_eq!(profile.get("beta").unwrap(), 1.2);
        assert_eq!(profile.get("recommendationKey").unwrap(), "buy");
        assert_eq!(profile.get("description").unwrap(), "Phones.");
    }

    #[test]
    fn test_zero_and_empty_sources_fall_through() {
        let quote = YahooQuote {
            regular_market_price: Some(190.5),
            regular_market_previous_close: Some(188.0),
            ..Default::default()
        };
        let profile = build_profile("AAPL", Some(&quote), Some(&summary()), now());
        // summary price is 0 so the quote price is used
        assert_eq!(profile.get("price").unwrap(), 190.5);
        assert_eq!(profile.get("prevClose").unwrap(), 188.0);
        assert_eq!(profile.get("industry").unwrap(), "Unknown");
        assert_eq!(profile.get("forwardPE").unwrap(), 0.0);
    }

    #[test]
    fn test_defaults_without_summary() {
        let profile = build_profile("1211.SR", Some(&YahooQuote::default()), None, now());
        assert_eq!(profile.get("symbol").unwrap(), "1211.SR");
        assert_eq!(profile.get("shortName").unwrap(), "Ma'aden");
        assert_eq!(profile.get("longName").unwrap(), "Ma'aden");
        assert_eq!(profile.get("currency").unwrap(), "SAR");
        assert_eq!(profile.get("exchange").unwrap(), "Unknown");
        assert_eq!(profile.get("recommendationKey").unwrap(), "none");
        assert_eq!(profile.get("website").unwrap(), "");
        assert_eq!(profile.get("source").unwrap(), PROFILE_SOURCE);
        assert_eq!(profile.get("lastUpdated").unwrap(), "2024-03-01T12:00:00.000Z");

        let unknown = build_profile("XYZ.CA", None, None, now());
        assert_eq!(unknown.get("shortName").unwrap(), "XYZ.CA");
        assert_eq!(unknown.get("currency").unwrap(), "EGP");
    }

    #[test]
    fn test_rules_cover_every_field_once() {
        let mut fields: Vec<&str> = PROFILE_RULES.iter().map(|r| r.field).collect();
        let total = fields.len();
        fields.sort_unstable();
        fields.dedup();
        assert_eq!(fields.len(), total);
        assert_eq!(total, 40);
    }
}
