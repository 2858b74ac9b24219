use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::accounts::ELITE_ANALYST;
use crate::models::{LeaderboardEntry, Tweet};

const TAB_LIMIT: usize = 20;
const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Fresh,
    Trending,
    TopAnalysts,
    MostEngaged,
}

impl Tab {
    /// Unknown or missing values select the fresh tab.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("trending") => Tab::Trending,
            Some("top-analysts") => Tab::TopAnalysts,
            Some("most-engaged") => Tab::MostEngaged,
            _ => Tab::Fresh,
        }
    }

    /// Select the tweets shown on this tab; `tweets` is newest first.
    pub fn select(self, tweets: &[Tweet], now: DateTime<Utc>) -> Vec<Tweet> {
        match self {
            Tab::Fresh => tweets.iter().take(TAB_LIMIT).cloned().collect(),
            Tab::Trending => {
                let since = now - Duration::hours(24);
                let mut recent: Vec<Tweet> = tweets
                    .iter()
                    .filter(|t| t.timestamp > since)
                    .cloned()
                    .collect();
                recent.sort_by(|a, b| b.engagement_score.cmp(&a.engagement_score));
                recent.truncate(TAB_LIMIT);
                recent
            }
            Tab::TopAnalysts => tweets
                .iter()
                .filter(|t| t.tier == 1 || t.category == ELITE_ANALYST)
                .take(TAB_LIMIT)
                .cloned()
                .collect(),
            Tab::MostEngaged => {
                let mut sorted = tweets.to_vec();
                sorted.sort_by(|a, b| b.engagement_score.cmp(&a.engagement_score));
                sorted.truncate(TAB_LIMIT);
                sorted
            }
        }
    }
}

/// Top authors by total engagement.
pub fn leaderboard(tweets: &[Tweet]) -> Vec<LeaderboardEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<LeaderboardEntry> = Vec::new();

    for tweet in tweets {
        let slot = *index.entry(tweet.username.as_str()).or_insert_with(|| {
            entries.push(LeaderboardEntry {
                username: tweet.username.clone(),
                display_name: tweet.display_name.clone(),
                profile_image: tweet.profile_image.clone(),
                category: tweet.category.clone(),
                tier: tweet.tier,
                total_posts: 0,
                total_engagement: 0,
                avg_engagement: 0,
            });
            entries.len() - 1
        });
        let entry = &mut entries[slot];
        entry.total_posts += 1;
        entry.total_engagement += tweet.engagement_score;
    }

    for entry in &mut entries {
        entry.avg_engagement =
            (entry.total_engagement as f64 / entry.total_posts as f64).round() as u64;
    }
    entries.sort_by(|a, b| b.total_engagement.cmp(&a.total_engagement));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_tweets;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
    }

    fn tweet(username: &str, tier: u8, category: &str, hours_ago: i64, score: u64) -> Tweet {
        let mut t = demo_tweets(now()).remove(0);
        t.id = format!("{}-{}", username, hours_ago);
        t.username = username.to_string();
        t.tier = tier;
        t.category = category.to_string();
        t.timestamp = now() - Duration::hours(hours_ago);
        t.engagement_score = score;
        t
    }

    #[test]
    fn test_tab_from_param() {
        assert_eq!(Tab::from_param(Some("trending")), Tab::Trending);
        assert_eq!(Tab::from_param(Some("top-analysts")), Tab::TopAnalysts);
        assert_eq!(Tab::from_param(Some("most-engaged")), Tab::MostEngaged);
        assert_eq!(Tab::from_param(Some("whatever")), Tab::Fresh);
        assert_eq!(Tab::from_param(None), Tab::Fresh);
    }

    #[test]
    fn test_trending_only_last_day() {
        let tweets = vec![
            tweet("a", 3, "Technical", 1, 10),
            tweet("b", 3, "Technical", 30, 500),
            tweet("c", 3, "Technical", 2, 40),
        ];
        let trending = Tab::Trending.select(&tweets, now());
        let users: Vec<&str> = trending.iter().map(|t| t.username.as_str()).collect();
        assert_eq!(users, vec!["c", "a"]);
    }

    #[test]
    fn test_top_analysts_keeps_order() {
        let tweets = vec![
            tweet("a", 2, ELITE_ANALYST, 1, 10),
            tweet("b", 2, "Technical", 2, 500),
            tweet("c", 1, "Charts", 3, 40),
        ];
        let top = Tab::TopAnalysts.select(&tweets, now());
        let users: Vec<&str> = top.iter().map(|t| t.username.as_str()).collect();
        assert_eq!(users, vec!["a", "c"]);
    }

    #[test]
    fn test_tabs_are_limited() {
        let tweets: Vec<Tweet> = (0..30).map(|i| tweet("a", 1, "News", i, i as u64)).collect();
        assert_eq!(Tab::Fresh.select(&tweets, now()).len(), 20);
        let engaged = Tab::MostEngaged.select(&tweets, now());
        assert_eq!(engaged.len(), 20);
        assert_eq!(engaged[0].engagement_score, 29);
    }

    #[test]
    fn test_leaderboard_totals() {
        let tweets = vec![
            tweet("a", 1, "News", 1, 10),
            tweet("b", 1, "News", 2, 25),
            tweet("a", 1, "News", 3, 5),
            tweet("c", 1, "News", 4, 15),
        ];
        let board = leaderboard(&tweets);
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].username, "b");
        // equal totals keep first-seen order
        assert_eq!(board[1].username, "a");
        assert_eq!(board[1].total_posts, 2);
        assert_eq!(board[1].total_engagement, 15);
        assert_eq!(board[1].avg_engagement, 8);
        assert_eq!(board[2].username, "c");
    }

    #[test]
    fn test_leaderboard_top_ten() {
        let tweets: Vec<Tweet> = (0..15)
            .map(|i| tweet(&format!("user{}", i), 2, "News", 1, i as u64))
            .collect();
        let board = leaderboard(&tweets);
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].username, "user14");
    }
}
