use chrono::{DateTime, Duration, Utc};
use stockhero_core::utils::time_utils::relative_time;

use crate::accounts::{ELITE_ANALYST, FUNDAMENTAL, INFLUENCER, NEWS, TECHNICAL};
use crate::models::Tweet;

struct DemoTweet {
    id: &'static str,
    username: &'static str,
    display_name: &'static str,
    category: &'static str,
    tier: u8,
    content: &'static str,
    age_ms: i64,
    likes: u64,
    retweets: u64,
    replies: u64,
    engagement_score: u64,
}

const DEMO: [DemoTweet; 8] = [
    DemoTweet {
        id: "d1",
        username: "THEWOLFOFTASI",
        display_name: "The Wolf of TASI",
        category: ELITE_ANALYST,
        tier: 1,
        content: "Major breakout on $1120 Al Rajhi Bank! Target 100 SAR. 🚀 #TASI",
        age_ms: 0,
        likes: 520,
        retweets: 120,
        replies: 45,
        engagement_score: 900,
    },
    DemoTweet {
        id: "d2",
        username: "Anas_S_Alrajhi",
        display_name: "Anas Al-Rajhi",
        category: ELITE_ANALYST,
        tier: 1,
        content: "Market sentiment shifting to Bullish. Focus on Petrochemicals. $2010 SABIC looks primed.",
        age_ms: 3_600_000,
        likes: 340,
        retweets: 80,
        replies: 20,
        engagement_score: 600,
    },
    DemoTweet {
        id: "d3",
        username: "RiadhAlhumaidan",
        display_name: "Riyadh Al-Humaidan",
        category: ELITE_ANALYST,
        tier: 1,
        content: "Oil prices rebounding. Good for $2222 Aramco. Support at 32.5 holding strong.",
        age_ms: 7_200_000,
        likes: 210,
        retweets: 40,
        replies: 15,
        engagement_score: 400,
    },
    DemoTweet {
        id: "d4",
        username: "FutrueGlimpse",
        display_name: "Future Glimpse",
        category: NEWS,
        tier: 1,
        content: "Visualizing the liquidity flow into banking sector. $1180 SNB leading.",
        age_ms: 10_800_000,
        likes: 180,
        retweets: 30,
        replies: 10,
        engagement_score: 300,
    },
    DemoTweet {
        id: "d5",
        username: "ahmadammar1993",
        display_name: "Ahmad Ammar",
        category: INFLUENCER,
        tier: 1,
        content: "Technical View: TASI attempting to cross 12,000. Critical resistance.",
        age_ms: 14_400_000,
        likes: 150,
        retweets: 25,
        replies: 8,
        engagement_score: 250,
    },
    DemoTweet {
        id: "d6",
        username: "Saad1100110",
        display_name: "Saad",
        category: TECHNICAL,
        tier: 2,
        content: "Chart update for $4030 Bahri. Forming cup and handle pattern.",
        age_ms: 18_000_000,
        likes: 120,
        retweets: 20,
        replies: 5,
        engagement_score: 200,
    },
    DemoTweet {
        id: "d7",
        username: "SenseiFund",
        display_name: "Sensei Fund",
        category: FUNDAMENTAL,
        tier: 1,
        content: "ACWA Power $2082 showing strong recurring revenue growth.",
        age_ms: 21_000_000,
        likes: 90,
        retweets: 15,
        replies: 5,
        engagement_score: 180,
    },
    DemoTweet {
        id: "d8",
        username: "oqo888",
        display_name: "OQO",
        category: TECHNICAL,
        tier: 2,
        content: "Quick scalp on $4002 Mouwasat. Entry 240, Target 245.",
        age_ms: 25_000_000,
        likes: 80,
        retweets: 10,
        replies: 2,
        engagement_score: 150,
    },
];

/// Fixed feed served when no live tweet could be collected.
pub fn demo_tweets(now: DateTime<Utc>) -> Vec<Tweet> {
    DEMO.iter()
        .map(|demo| {
            let timestamp = now - Duration::milliseconds(demo.age_ms);
            Tweet {
                id: demo.id.to_string(),
                username: demo.username.to_string(),
                display_name: demo.display_name.to_string(),
                category: demo.category.to_string(),
                tier: demo.tier,
                profile_image: None,
                content: demo.content.to_string(),
                images: Vec::new(),
                timestamp,
                relative_time: relative_time(timestamp, now),
                url: format!("https://x.com/{}/status/{}", demo.username, demo.id),
                likes: demo.likes,
                retweets: demo.retweets,
                replies: demo.replies,
                source: "demo".to_string(),
                engagement_score: demo.engagement_score,
                translated_content: None,
                original_lang: None,
            }
        })
        .collect()
}
