use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use stockhero_core::cache::TtlCache;
use stockhero_translation::{contains_arabic, translate_arabic_to_english, Translator};
use tracing::{info, warn};

use crate::feeds::NewsFeed;
use crate::models::NewsArticle;
use crate::queries::{market_queries, normalize_market};

/// Title characters compared when deduplicating.
const DEDUPE_PREFIX: usize = 50;
/// Google is only asked the first queries of a market.
const GOOGLE_QUERIES: usize = 2;
const TRANSLATED_TITLES: usize = 20;
const MAX_ARTICLES: usize = 50;

/// Keep the first article for each lowercased 50-character title prefix.
pub fn dedupe_by_title_prefix(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| {
            let key: String = article
                .title
                .to_lowercase()
                .chars()
                .take(DEDUPE_PREFIX)
                .collect();
            seen.insert(key)
        })
        .collect()
}

struct Refreshed {
    articles: Vec<NewsArticle>,
    all_failed: bool,
}

pub struct NewsService {
    bing: Arc<dyn NewsFeed>,
    google: Arc<dyn NewsFeed>,
    translator: Arc<dyn Translator>,
    cache: TtlCache<Vec<NewsArticle>>,
}

impl NewsService {
    pub fn new(
        bing: Arc<dyn NewsFeed>,
        google: Arc<dyn NewsFeed>,
        translator: Arc<dyn Translator>,
        cache: TtlCache<Vec<NewsArticle>>,
    ) -> Self {
        Self {
            bing,
            google,
            translator,
            cache,
        }
    }

    /// Articles for `market`, served from cache while fresh.
    ///
    /// A failing feed counts as an empty list. When every feed failed the
    /// last cached copy is returned even if it has expired, else an empty
    /// list.
    pub async fn articles(&self, market: Option<&str>) -> Vec<NewsArticle> {
        let market = normalize_market(market);

        if let Some(entry) = self.cache.get_fresh(&market) {
            if !entry.data.is_empty() {
                info!("News cache hit for {}", market);
                return entry.data;
            }
        }

        let refreshed = self.refresh(&market).await;
        if refreshed.all_failed {
            if let Some(stale) = self.cache.get_any(&market) {
                warn!("Every news feed failed for {}, serving cached copy", market);
                return stale.data;
            }
        }
        if !refreshed.articles.is_empty() {
            self.cache.insert(market.clone(), refreshed.articles.clone());
        }
        refreshed.articles
    }

    async fn refresh(&self, market: &str) -> Refreshed {
        let now = self.cache.now();
        let queries = market_queries(market);

        let bing = queries.iter().map(|q| self.bing.search(q, now));
        let google = queries
            .iter()
            .take(GOOGLE_QUERIES)
            .map(|q| self.google.search(q, now));
        let (bing, google) = futures::join!(join_all(bing), join_all(google));

        let total = bing.len() + google.len();
        let mut failures = 0;
        let mut merged = Vec::new();
        let results = bing
            .into_iter()
            .map(|r| (self.bing.source(), r))
            .chain(google.into_iter().map(|r| (self.google.source(), r)));
        for (source, result) in results {
            match result {
                Ok(mut articles) => merged.append(&mut articles),
                Err(e) => {
                    warn!("{} feed failed for {}: {}", source, market, e);
                    failures += 1;
                }
            }
        }

        let mut articles = dedupe_by_title_prefix(merged);
        // ISO timestamps share one format, so string order is time order.
        articles.sort_by(|a, b| b.time.cmp(&a.time));
        self.translate_titles(&mut articles).await;
        articles.truncate(MAX_ARTICLES);

        info!("Fetched {} news articles for {}", articles.len(), market);
        Refreshed {
            articles,
            all_failed: total > 0 && failures == total,
        }
    }

    async fn translate_titles(&self, articles: &mut [NewsArticle]) {
        let targets: Vec<&mut NewsArticle> = articles
            .iter_mut()
            .filter(|article| contains_arabic(&article.title))
            .take(TRANSLATED_TITLES)
            .collect();

        let translator = self.translator.as_ref();
        let translations = join_all(
            targets
                .iter()
                .map(|article| translate_arabic_to_english(translator, &article.title)),
        )
        .await;

        for (article, title_en) in targets.into_iter().zip(translations) {
            article.title_en = Some(title_en);
            article.original_lang = Some("ar".to_string());
        }
    }
}
