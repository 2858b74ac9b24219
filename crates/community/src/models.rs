use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockhero_core::utils::time_utils::iso_millis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub category: String,
    pub tier: u8,
    pub profile_image: Option<String>,
    pub content: String,
    pub images: Vec<String>,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub relative_time: String,
    pub url: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub source: String,
    pub engagement_score: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub display_name: String,
    pub profile_image: Option<String>,
    pub category: String,
    pub tier: u8,
    pub total_posts: u64,
    pub total_engagement: u64,
    pub avg_engagement: u64,
}

/// Payload of the community endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityFeed {
    pub success: bool,
    pub tab: String,
    pub tweets: Vec<Tweet>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub accounts: usize,
    pub total_tweets: usize,
    pub cached: bool,
    pub fetched_at: String,
}
