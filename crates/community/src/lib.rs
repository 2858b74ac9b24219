//! X (Twitter) community feed.
//!
//! A fixed roster of market accounts is sampled through the public
//! syndication timeline, filtered for market relevance, scored by
//! engagement and served per tab together with a leaderboard.

pub mod accounts;
pub mod demo;
pub mod errors;
pub mod filter;
pub mod models;
pub mod service;
pub mod syndication;
pub mod tabs;

pub use accounts::{find_account, Account, ACCOUNTS};
pub use demo::demo_tweets;
pub use errors::CommunityError;
pub use models::{CommunityFeed, LeaderboardEntry, Tweet};
pub use service::CommunityService;
pub use syndication::{SyndicationClient, TimelineSource, SYNDICATION_URL};
pub use tabs::{leaderboard, Tab};
