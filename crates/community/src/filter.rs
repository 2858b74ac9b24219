//! Relevance filter and engagement scoring.

use lazy_static::lazy_static;
use regex::Regex;

/// Posts shorter than this (in characters) carry no signal.
const MIN_LENGTH: usize = 15;

const KEYWORDS: &[&str] = &[
    "tasi", "stock", "market", "price", "sar", "profit", "chart", "analy", "invest", "trade", "سوق",
    "اسهم", "تاسي", "سهم", "تداول", "تحليل", "فني", "مالي", "ارباح",
];

lazy_static! {
    /// A standalone four digit number, usually a Tadawul ticker.
    static ref TICKER_NUMBER: Regex =
        Regex::new(r"(?-u:\b)[0-9]{4}(?-u:\b)").expect("Invalid regex pattern");
    static ref TRAILING_TCO: Regex =
        Regex::new(r"https://t\.co/\w+$").expect("Invalid regex pattern");
}

/// Whether a post looks market related.
pub fn is_valid_tweet(text: &str, has_media: bool) -> bool {
    if has_media {
        return true;
    }
    if text.chars().count() < MIN_LENGTH {
        return false;
    }
    if TICKER_NUMBER.is_match(text) {
        return true;
    }
    let lower = text.to_lowercase();
    KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Drop a trailing `https://t.co/…` link and surrounding whitespace.
pub fn strip_trailing_link(text: &str) -> String {
    TRAILING_TCO.replace(text, "").trim().to_string()
}

/// Weighted interactions, boosted for tier 1 and tier 2 authors.
pub fn engagement_score(likes: u64, retweets: u64, replies: u64, tier: u8) -> u64 {
    let bonus = match tier {
        1 => 1.5,
        2 => 1.2,
        _ => 1.0,
    };
    let raw = (likes + retweets * 2 + replies * 3) as f64;
    (raw * bonus).round() as u64
}
