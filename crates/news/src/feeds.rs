use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockhero_core::http::UpstreamClient;
use stockhero_core::utils::time_utils::{parse_rfc2822, to_iso_string};
use tracing::debug;
use urlencoding::encode;

use crate::errors::NewsError;
use crate::models::NewsArticle;
use crate::rss::{parse_items, strip_html, truncate_chars, RssItem};

pub const BING_NEWS_URL: &str = "https://www.bing.com/news/search";
pub const GOOGLE_NEWS_URL: &str = "https://news.google.com/rss/search";

/// Maximum length of the article teaser.
const CONTENT_LIMIT: usize = 300;
/// Google returns long feeds; only the head of each is used.
const GOOGLE_ITEMS_PER_QUERY: usize = 5;

/// A searchable news source.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    fn source(&self) -> &'static str;

    /// Articles matching `query`. `now` stamps items with no usable date.
    async fn search(&self, query: &str, now: DateTime<Utc>) -> Result<Vec<NewsArticle>, NewsError>;
}

fn iso_time(pub_date: Option<&str>, now: DateTime<Utc>) -> String {
    let instant = pub_date.and_then(parse_rfc2822).unwrap_or(now);
    to_iso_string(&instant)
}

fn article(
    item: RssItem,
    source: &str,
    content: String,
    publisher: String,
    now: DateTime<Utc>,
) -> Option<NewsArticle> {
    let title = item.title?;
    let link = item.link?;
    Some(NewsArticle {
        title,
        link,
        content,
        publisher,
        time: iso_time(item.pub_date.as_deref(), now),
        image: None,
        source: source.to_string(),
        title_en: None,
        original_lang: None,
    })
}

/// Bing News RSS search.
pub struct BingNewsFeed {
    http: UpstreamClient,
    base_url: String,
}

impl BingNewsFeed {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, query: &str) -> String {
        format!("{}?q={}&format=rss&count=10", self.base_url, encode(query))
    }
}

/// Map a Bing item; items missing a title or link are skipped.
pub fn bing_article(item: RssItem, now: DateTime<Utc>) -> Option<NewsArticle> {
    let content = item
        .description
        .as_deref()
        .map(|d| truncate_chars(strip_html(d).trim(), CONTENT_LIMIT))
        .unwrap_or_default();
    let publisher = item
        .news_source
        .clone()
        .or_else(|| item.source_attr.clone())
        .unwrap_or_else(|| "News".to_string());
    article(item, "bing", content, publisher, now)
}

#[async_trait]
impl NewsFeed for BingNewsFeed {
    fn source(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str, now: DateTime<Utc>) -> Result<Vec<NewsArticle>, NewsError> {
        let body = self.http.get_text("bing-news", &self.url(query), None).await?;
        let items = parse_items(&body)?;
        debug!("Bing returned {} items for '{}'", items.len(), query);
        Ok(items
            .into_iter()
            .filter_map(|item| bing_article(item, now))
            .collect())
    }
}

/// Google News RSS search.
pub struct GoogleNewsFeed {
    http: UpstreamClient,
    base_url: String,
}

impl GoogleNewsFeed {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, query: &str) -> String {
        format!("{}?q={}&hl=en&gl=US&ceid=US:en", self.base_url, encode(query))
    }
}

pub fn google_article(item: RssItem, now: DateTime<Utc>) -> Option<NewsArticle> {
    let publisher = item
        .source
        .clone()
        .unwrap_or_else(|| "Google News".to_string());
    article(item, "google", String::new(), publisher, now)
}

#[async_trait]
impl NewsFeed for GoogleNewsFeed {
    fn source(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str, now: DateTime<Utc>) -> Result<Vec<NewsArticle>, NewsError> {
        let body = self.http.get_text("google-news", &self.url(query), None).await?;
        let items = parse_items(&body)?;
        Ok(items
            .into_iter()
            .take(GOOGLE_ITEMS_PER_QUERY)
            .filter_map(|item| google_article(item, now))
            .collect())
    }
}
