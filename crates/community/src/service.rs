use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use stockhero_core::cache::TtlCache;
use stockhero_core::utils::time_utils::to_iso_string;
use stockhero_translation::{contains_arabic, translate_arabic_to_english, Translator};
use tracing::{debug, info, warn};

use crate::accounts::{Account, ACCOUNTS};
use crate::demo::demo_tweets;
use crate::errors::CommunityError;
use crate::models::{CommunityFeed, Tweet};
use crate::syndication::{build_tweets, TimelineSource};
use crate::tabs::{leaderboard, Tab};

/// The whole feed is cached under a single key; tabs are cut from it.
pub const CACHE_KEY: &str = "all";
const BATCH_SIZE: usize = 6;
const MAX_JITTER: Duration = Duration::from_millis(500);
const TRANSLATED_TWEETS: usize = 40;

pub struct CommunityService {
    source: Arc<dyn TimelineSource>,
    translator: Arc<dyn Translator>,
    cache: TtlCache<Vec<Tweet>>,
    max_jitter: Duration,
}

impl CommunityService {
    pub fn new(
        source: Arc<dyn TimelineSource>,
        translator: Arc<dyn Translator>,
        cache: TtlCache<Vec<Tweet>>,
    ) -> Self {
        Self {
            source,
            translator,
            cache,
            max_jitter: MAX_JITTER,
        }
    }

    /// Upper bound of the random delay before each timeline request.
    pub fn with_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Feed for `tab`. `refresh` skips the cache lookup but still stores
    /// the new result.
    pub async fn feed(&self, tab: Option<&str>, refresh: bool) -> Result<CommunityFeed, CommunityError> {
        let label = tab.filter(|t| !t.is_empty()).unwrap_or("fresh");
        let requested_at = self.cache.now();

        if !refresh {
            if let Some(entry) = self.cache.get_fresh(CACHE_KEY) {
                debug!("Community cache hit ({} tweets)", entry.data.len());
                return Ok(self.shape(label, entry.data, true, entry.timestamp));
            }
        }

        let mut tweets = self.fetch_all().await?;
        if tweets.is_empty() {
            warn!("No live tweets collected, serving demo feed");
            tweets = demo_tweets(requested_at);
        }

        self.cache.insert_at(CACHE_KEY, tweets.clone(), requested_at);
        Ok(self.shape(label, tweets, false, requested_at))
    }

    fn shape(&self, label: &str, tweets: Vec<Tweet>, cached: bool, fetched_at: DateTime<Utc>) -> CommunityFeed {
        let selected = Tab::from_param(Some(label)).select(&tweets, self.cache.now());
        CommunityFeed {
            success: true,
            tab: label.to_string(),
            tweets: selected,
            leaderboard: leaderboard(&tweets),
            accounts: ACCOUNTS.len(),
            total_tweets: tweets.len(),
            cached,
            fetched_at: to_iso_string(&fetched_at),
        }
    }

    fn jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }

    async fn fetch_all(&self) -> Result<Vec<Tweet>, CommunityError> {
        let started = Instant::now();
        let now = self.cache.now();

        let mut accounts: Vec<&'static Account> = ACCOUNTS.iter().collect();
        accounts.shuffle(&mut rand::thread_rng());

        let mut collected = Vec::new();
        for batch in accounts.chunks(BATCH_SIZE) {
            let handles: Vec<_> = batch
                .iter()
                .map(|account| {
                    let delay = self.jitter();
                    let source = Arc::clone(&self.source);
                    let username = account.username;
                    tokio::spawn(async move {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        (username, source.timeline(username).await)
                    })
                })
                .collect();

            for joined in join_all(handles).await {
                let (username, result) = joined.map_err(|e| CommunityError::Task(e.to_string()))?;
                match result {
                    Ok(raw) => collected.extend(build_tweets(username, raw, now)),
                    Err(e) => warn!("Timeline fetch failed for @{}: {}", username, e),
                }
            }
        }

        collected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let mut seen = HashSet::new();
        collected.retain(|tweet| seen.insert(tweet.id.clone()));

        self.translate_contents(&mut collected).await;

        info!(
            "Collected {} community tweets in {}ms",
            collected.len(),
            started.elapsed().as_millis()
        );
        Ok(collected)
    }

    async fn translate_contents(&self, tweets: &mut [Tweet]) {
        let targets: Vec<&mut Tweet> = tweets
            .iter_mut()
            .take(TRANSLATED_TWEETS)
            .filter(|tweet| contains_arabic(&tweet.content))
            .collect();

        let translator = self.translator.as_ref();
        let translations = join_all(
            targets
                .iter()
                .map(|tweet| translate_arabic_to_english(translator, &tweet.content)),
        )
        .await;

        for (tweet, translated) in targets.into_iter().zip(translations) {
            tweet.translated_content = Some(translated);
            tweet.original_lang = Some("ar".to_string());
        }
    }
}
