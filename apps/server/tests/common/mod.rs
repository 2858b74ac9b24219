#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use stockhero_ai::{AiError, ChatCompletion, ChatRequest};
use stockhero_community::{
    syndication::SyndicationTweet, CommunityError, CommunityService, TimelineSource,
};
use stockhero_core::{
    cache::{ManualClock, TtlCache},
    http::UpstreamClient,
};
use stockhero_market_data::{
    provider::yahoo::models::{YahooChartResult, YahooQuote, YahooQuoteSummaryResult},
    ChartRequest, MarketDataError, QuoteSource, RateLimit,
};
use stockhero_news::{NewsArticle, NewsError, NewsFeed, PageSource};
use stockhero_server::{api::app_router, config::Config, AppState, Upstreams};
use stockhero_translation::{TranslationError, Translator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap()
}

/// Quote source answering from canned data.
#[derive(Default)]
pub struct FakeQuotes {
    pub chart: Option<YahooChartResult>,
    pub quote: Option<YahooQuote>,
    pub fail_quotes: bool,
    pub chart_calls: AtomicUsize,
    pub quote_calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn with_quote(quote: YahooQuote) -> Self {
        Self {
            quote: Some(quote),
            ..Self::default()
        }
    }
}

#[async_trait]
impl QuoteSource for FakeQuotes {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            max_symbols_per_request: 10,
            min_delay: Duration::ZERO,
        }
    }

    async fn quotes(&self, symbols: &[String]) -> Result<Vec<YahooQuote>, MarketDataError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_quotes {
            return Err(MarketDataError::ProviderError {
                provider: "fake".to_string(),
                message: "quote endpoint down".to_string(),
            });
        }
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                self.quote.as_ref().map(|q| YahooQuote {
                    symbol: Some(symbol.clone()),
                    ..q.clone()
                })
            })
            .collect())
    }

    async fn chart(
        &self,
        _symbol: &str,
        _request: &ChartRequest,
    ) -> Result<Option<YahooChartResult>, MarketDataError> {
        self.chart_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.chart.clone())
    }

    async fn quote_summary(
        &self,
        _symbol: &str,
    ) -> Result<Option<YahooQuoteSummaryResult>, MarketDataError> {
        Ok(None)
    }
}

/// News feed returning the same articles for every query.
pub struct FakeFeed {
    name: &'static str,
    articles: Vec<NewsArticle>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeFeed {
    pub fn new(name: &'static str, articles: Vec<NewsArticle>) -> Self {
        Self {
            name,
            articles,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsFeed for FakeFeed {
    fn source(&self) -> &'static str {
        self.name
    }

    async fn search(&self, _query: &str, _now: DateTime<Utc>) -> Result<Vec<NewsArticle>, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NewsError::Xml(format!("{} feed unreachable", self.name)));
        }
        Ok(self.articles.clone())
    }
}

pub fn article(title: &str, link: &str, time: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        link: link.to_string(),
        content: String::new(),
        publisher: "Argaam".to_string(),
        time: time.to_string(),
        image: None,
        source: "bing".to_string(),
        title_en: None,
        original_lang: None,
    }
}

/// Web pages served from a fixed map; anything else answers 404.
#[derive(Default)]
pub struct FakePages {
    pages: std::collections::HashMap<String, String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl PageSource for FakePages {
    async fn fetch(&self, url: &str) -> Result<String, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| {
            NewsError::Upstream(stockhero_core::Error::UpstreamStatus {
                upstream: "article".to_string(),
                status: 404,
            })
        })
    }
}

/// Every account has an empty timeline.
#[derive(Default)]
pub struct EmptyTimeline {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TimelineSource for EmptyTimeline {
    async fn timeline(&self, _username: &str) -> Result<Vec<SyndicationTweet>, CommunityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Upper-cases text; fails on anything containing "FAIL".
pub struct ShoutingTranslator;

#[async_trait]
impl Translator for ShoutingTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslationError> {
        if text.contains("FAIL") {
            return Err(TranslationError::Upstream(stockhero_core::Error::Unexpected(
                "connection reset".to_string(),
            )));
        }
        Ok(text.to_uppercase())
    }
}

/// Chat model that counts calls and answers with a fixed string.
#[derive(Default)]
pub struct CountingModel {
    pub calls: AtomicUsize,
    pub last_request: std::sync::Mutex<Option<ChatRequest>>,
}

#[async_trait]
impl ChatCompletion for CountingModel {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(Some("Aramco looks steady.".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub quotes: Arc<FakeQuotes>,
    pub bing: Arc<FakeFeed>,
    pub google: Arc<FakeFeed>,
    pub timelines: Arc<EmptyTimeline>,
    pub pages: Arc<FakePages>,
}

#[derive(Default)]
pub struct TestSetup {
    pub quotes: FakeQuotes,
    pub bing: Vec<NewsArticle>,
    pub google: Vec<NewsArticle>,
    pub feeds_fail: bool,
    pub chat: Option<Arc<dyn ChatCompletion>>,
    pub image_max_bytes: Option<usize>,
    pub pages: Vec<(String, String)>,
}

impl TestApp {
    pub fn new(setup: TestSetup) -> Self {
        let config = Config::default();
        let clock = Arc::new(ManualClock::new(start()));
        let quotes = Arc::new(setup.quotes);
        let (bing, google) = if setup.feeds_fail {
            (FakeFeed::failing("bing"), FakeFeed::failing("google"))
        } else {
            (
                FakeFeed::new("bing", setup.bing),
                FakeFeed::new("google", setup.google),
            )
        };
        let (bing, google) = (Arc::new(bing), Arc::new(google));
        let timelines = Arc::new(EmptyTimeline::default());
        let pages = Arc::new(FakePages {
            pages: setup.pages.into_iter().collect(),
            calls: AtomicUsize::new(0),
        });
        let translator: Arc<dyn Translator> = Arc::new(ShoutingTranslator);

        let upstreams = Upstreams {
            quotes: quotes.clone(),
            bing: bing.clone(),
            google: google.clone(),
            pages: pages.clone(),
            timelines: timelines.clone(),
            translator: translator.clone(),
            chat: setup.chat,
        };
        let http = UpstreamClient::new(Duration::from_secs(5)).unwrap();
        let mut state = AppState::new(&config, http, upstreams, clock.clone());
        state.community_service = CommunityService::new(
            timelines.clone(),
            translator,
            TtlCache::new(config.community_cache_ttl, clock.clone()),
        )
        .with_jitter(Duration::ZERO);
        if let Some(limit) = setup.image_max_bytes {
            state.image_max_bytes = limit;
        }

        Self {
            router: app_router(Arc::new(state), &config),
            clock,
            quotes,
            bing,
            google,
            timelines,
            pages,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, HeaderMap, Bytes) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Answer one connection on a loopback port with a canned HTTP response.
pub async fn serve_once(response: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{}", addr)
}

pub fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}
