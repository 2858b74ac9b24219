//! Public syndication timeline.
//!
//! The embed page for a profile is a Next.js document whose
//! `script#__NEXT_DATA__` carries the timeline as JSON.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde::Deserialize;
use stockhero_core::http::{UpstreamClient, HTML_ACCEPT};
use stockhero_core::utils::time_utils::relative_time;
use urlencoding::encode;

use crate::accounts::{find_account, DEFAULT_TIER, INFLUENCER};
use crate::errors::CommunityError;
use crate::filter::{engagement_score, is_valid_tweet, strip_trailing_link};
use crate::models::Tweet;

pub const SYNDICATION_URL: &str = "https://syndication.twitter.com/srv/timeline-profile/screen-name";

/// `created_at` format used by the timeline (`Wed Mar 06 10:00:00 +0000 2024`).
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

lazy_static! {
    static ref NEXT_DATA: Selector =
        Selector::parse("script#__NEXT_DATA__").expect("Invalid selector");
}

#[derive(Debug, Default, Deserialize)]
struct NextData {
    #[serde(default)]
    props: Props,
}

#[derive(Debug, Default, Deserialize)]
struct Props {
    #[serde(rename = "pageProps", default)]
    page_props: PageProps,
}

#[derive(Debug, Default, Deserialize)]
struct PageProps {
    timeline: Option<Timeline>,
}

#[derive(Debug, Default, Deserialize)]
struct Timeline {
    #[serde(default)]
    entries: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
struct TimelineEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<EntryContent>,
}

#[derive(Debug, Deserialize)]
struct EntryContent {
    tweet: Option<SyndicationTweet>,
}

/// A tweet as embedded in the timeline page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyndicationTweet {
    pub id_str: Option<String>,
    pub full_text: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub favorite_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub user: Option<SyndicationUser>,
    pub entities: Option<Entities>,
    pub extended_entities: Option<Entities>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyndicationUser {
    pub name: Option<String>,
    pub profile_image_url_https: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    pub media: Option<Vec<Media>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub media_url_https: Option<String>,
}

/// Extract the tweets embedded in a timeline page.
pub fn parse_timeline_html(html: &str) -> Result<Vec<SyndicationTweet>, CommunityError> {
    let document = Html::parse_document(html);
    let script = document
        .select(&NEXT_DATA)
        .next()
        .ok_or(CommunityError::MissingNextData)?;
    let payload = script.text().collect::<String>();
    let data: NextData = serde_json::from_str(&payload)?;

    Ok(data
        .props
        .page_props
        .timeline
        .unwrap_or_default()
        .entries
        .into_iter()
        .filter(|entry| entry.kind.as_deref() == Some("tweet"))
        .filter_map(|entry| entry.content.and_then(|c| c.tweet))
        .collect())
}

fn photo_urls(tweet: &SyndicationTweet) -> Vec<String> {
    let media = tweet
        .extended_entities
        .as_ref()
        .and_then(|e| e.media.as_ref())
        .or_else(|| tweet.entities.as_ref().and_then(|e| e.media.as_ref()));
    media
        .map(|items| {
            items
                .iter()
                .filter(|m| m.kind.as_deref() == Some("photo"))
                .filter_map(|m| m.media_url_https.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_created_at(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_str(v, CREATED_AT_FORMAT).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Turn raw timeline tweets of `username` into feed tweets.
///
/// Retweets are skipped. Accounts outside the elite and chart categories
/// also lose posts that fail the relevance filter.
pub fn build_tweets(username: &str, raw: Vec<SyndicationTweet>, now: DateTime<Utc>) -> Vec<Tweet> {
    let account = find_account(username);

    raw.into_iter()
        .filter_map(|tweet| {
            let text = tweet
                .full_text
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| tweet.text.clone())
                .unwrap_or_default();
            if text.starts_with("RT @") {
                return None;
            }

            let images = photo_urls(&tweet);
            let content = strip_trailing_link(&text);
            let filtered = account.map_or(true, |a| !a.skips_filter());
            if filtered && !is_valid_tweet(&content, !images.is_empty()) {
                return None;
            }

            let tier = account.map_or(DEFAULT_TIER, |a| a.tier);
            let likes = tweet.favorite_count.unwrap_or(0);
            let retweets = tweet.retweet_count.unwrap_or(0);
            let replies = tweet.reply_count.unwrap_or(0);
            let timestamp = parse_created_at(tweet.created_at.as_deref()).unwrap_or(now);
            let id = tweet
                .id_str
                .clone()
                .unwrap_or_else(|| format!("{}_{}", username, now.timestamp_millis()));
            let user = tweet.user.unwrap_or_default();

            Some(Tweet {
                url: format!("https://x.com/{}/status/{}", username, id),
                id,
                username: username.to_string(),
                display_name: account
                    .map(|a| a.display_name.to_string())
                    .or(user.name)
                    .unwrap_or_else(|| username.to_string()),
                category: account.map_or(INFLUENCER, |a| a.category).to_string(),
                tier,
                profile_image: user
                    .profile_image_url_https
                    .map(|url| url.replace("_normal", "_400x400")),
                content,
                images,
                timestamp,
                relative_time: relative_time(timestamp, now),
                likes,
                retweets,
                replies,
                source: "syndication".to_string(),
                engagement_score: engagement_score(likes, retweets, replies, tier),
                translated_content: None,
                original_lang: None,
            })
        })
        .collect()
}

/// Source of raw timeline tweets for an account.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    async fn timeline(&self, username: &str) -> Result<Vec<SyndicationTweet>, CommunityError>;
}

pub struct SyndicationClient {
    http: UpstreamClient,
    base_url: String,
}

impl SyndicationClient {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TimelineSource for SyndicationClient {
    async fn timeline(&self, username: &str) -> Result<Vec<SyndicationTweet>, CommunityError> {
        let url = format!("{}/{}", self.base_url, encode(username));
        let html = self
            .http
            .get_text("syndication", &url, Some(HTML_ACCEPT))
            .await?;
        parse_timeline_html(&html)
    }
}
