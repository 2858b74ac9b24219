use std::sync::Arc;

use crate::config::Config;
use stockhero_ai::{ChatCompletion, ChatService, GroqClient};
use stockhero_community::{CommunityService, SyndicationClient, TimelineSource};
use stockhero_core::{
    cache::{Clock, SystemClock, TtlCache},
    http::UpstreamClient,
};
use stockhero_market_data::{
    ChartService, ProfileService, QuoteSource, StockListService, YahooProvider,
};
use stockhero_news::{
    ArticleService, BingNewsFeed, GoogleNewsFeed, NewsFeed, NewsService, PageSource, WebPages,
};
use stockhero_translation::{GoogleTranslator, Translator};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub chart_service: ChartService,
    pub stock_list_service: StockListService,
    pub profile_service: ProfileService,
    pub news_service: NewsService,
    pub article_service: ArticleService,
    pub community_service: CommunityService,
    pub chat_service: ChatService,
    /// Raw quote access for the rule-based insight endpoint.
    pub quote_source: Arc<dyn QuoteSource>,
    pub translator: Arc<dyn Translator>,
    /// Shared client for image passthrough.
    pub http: UpstreamClient,
    pub image_max_bytes: usize,
    pub clock: Arc<dyn Clock>,
    pub platform: String,
    pub groq_configured: bool,
}

/// Every third-party dependency the handlers reach through a trait seam.
pub struct Upstreams {
    pub quotes: Arc<dyn QuoteSource>,
    pub bing: Arc<dyn NewsFeed>,
    pub google: Arc<dyn NewsFeed>,
    pub pages: Arc<dyn PageSource>,
    pub timelines: Arc<dyn TimelineSource>,
    pub translator: Arc<dyn Translator>,
    pub chat: Option<Arc<dyn ChatCompletion>>,
}

impl Upstreams {
    pub fn live(config: &Config, http: &UpstreamClient) -> Self {
        let chat = config.groq_api_key.as_ref().map(|key| {
            Arc::new(GroqClient::new(http.clone(), config.groq_url.clone(), key.clone()))
                as Arc<dyn ChatCompletion>
        });
        Self {
            quotes: Arc::new(
                YahooProvider::new(http.clone(), config.yahoo_base_url.clone())
                    .with_cookie_url(config.yahoo_cookie_url.clone()),
            ),
            bing: Arc::new(BingNewsFeed::new(http.clone(), config.bing_news_url.clone())),
            google: Arc::new(GoogleNewsFeed::new(http.clone(), config.google_news_url.clone())),
            pages: Arc::new(WebPages::new(http.clone())),
            timelines: Arc::new(SyndicationClient::new(
                http.clone(),
                config.syndication_url.clone(),
            )),
            translator: Arc::new(GoogleTranslator::new(http.clone(), config.translate_url.clone())),
            chat,
        }
    }
}

impl AppState {
    pub fn new(
        config: &Config,
        http: UpstreamClient,
        upstreams: Upstreams,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let Upstreams {
            quotes,
            bing,
            google,
            pages,
            timelines,
            translator,
            chat,
        } = upstreams;

        let news_cache = TtlCache::new(config.news_cache_ttl, Arc::clone(&clock));
        let community_cache = TtlCache::new(config.community_cache_ttl, Arc::clone(&clock));

        Self {
            chart_service: ChartService::new(Arc::clone(&quotes), Arc::clone(&clock)),
            stock_list_service: StockListService::new(Arc::clone(&quotes)),
            profile_service: ProfileService::new(Arc::clone(&quotes)),
            news_service: NewsService::new(bing, google, Arc::clone(&translator), news_cache),
            article_service: ArticleService::new(pages, config.reader_url.clone()),
            community_service: CommunityService::new(
                timelines,
                Arc::clone(&translator),
                community_cache,
            ),
            groq_configured: chat.is_some(),
            chat_service: ChatService::new(chat),
            quote_source: quotes,
            translator,
            http,
            image_max_bytes: config.image_max_bytes,
            clock,
            platform: config.platform.clone(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SH_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("text") {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let http = UpstreamClient::new(config.upstream_timeout)?;
    let upstreams = Upstreams::live(config, &http);
    if upstreams.chat.is_none() {
        tracing::info!("GROQ_API_KEY not set, chatbot runs in demo mode");
    }
    tracing::info!(
        "Upstreams: yahoo={} bing={} google={} syndication={}",
        config.yahoo_base_url,
        config.bing_news_url,
        config.google_news_url,
        config.syndication_url
    );

    Ok(Arc::new(AppState::new(
        config,
        http,
        upstreams,
        Arc::new(SystemClock),
    )))
}
