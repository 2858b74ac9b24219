//! Stock Hero Market Data Crate
//!
//! Quote, chart and fundamentals retrieval on top of Yahoo Finance.
//!
//! # Overview
//!
//! - [`QuoteSource`] is the provider seam; [`YahooProvider`] is the live
//!   implementation and tests plug in fakes.
//! - [`ChartService`] resolves a price series through a fallback chain
//!   (chart API, then a series interpolated from the latest quote).
//! - [`StockListService`] maps batched quotes for a market onto
//!   [`StockSummary`] rows.
//! - [`ProfileService`] merges quote and quoteSummary data through the
//!   [`profile::PROFILE_RULES`] table.

pub mod chart;
pub mod errors;
pub mod profile;
pub mod provider;
pub mod stocks;
pub mod universe;

pub use chart::{ChartRange, ChartRequest, ChartSeries, ChartService};
pub use errors::MarketDataError;
pub use profile::{build_profile, ProfileService, StockProfile};
pub use provider::yahoo::{YahooProvider, YAHOO_BASE_URL, YAHOO_COOKIE_URL};
pub use provider::{QuoteSource, RateLimit};
pub use stocks::{map_stock_summary, StockListService, StockSummary};
