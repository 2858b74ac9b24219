//! Market news for the Stock Hero feed.
//!
//! Articles come from Bing News and Google News RSS searches, are merged,
//! deduplicated and sorted newest first, then cached per market. The
//! `article` module turns a linked page into reader-friendly HTML.

pub mod article;
pub mod errors;
pub mod feeds;
pub mod models;
pub mod queries;
pub mod rss;
pub mod service;

pub use article::{ArticleContent, ArticleService, PageSource, WebPages, READER_URL};
pub use errors::NewsError;
pub use feeds::{BingNewsFeed, GoogleNewsFeed, NewsFeed, BING_NEWS_URL, GOOGLE_NEWS_URL};
pub use models::NewsArticle;
pub use queries::{market_queries, normalize_market};
pub use service::{dedupe_by_title_prefix, NewsService};
