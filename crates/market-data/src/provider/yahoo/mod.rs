//! Yahoo Finance quote provider.
//!
//! Talks to the `query1.finance.yahoo.com` endpoints:
//! - v7 `quote` for batched snapshots (up to 10 symbols per call)
//! - v8 `chart` for price series
//! - v11 `quoteSummary` for fundamentals
//!
//! v7 and v11 want a session cookie plus a matching crumb. The pair is
//! fetched lazily, cached on the provider and dropped when Yahoo answers
//! 401, after which the request is retried once.

pub mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use stockhero_core::http::UpstreamClient;
use stockhero_core::Error as CoreError;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::chart::ChartRequest;
use crate::errors::MarketDataError;
use crate::provider::{QuoteSource, RateLimit};

use models::{
    YahooChartResponse, YahooChartResult, YahooQuote, YahooQuoteResponse,
    YahooQuoteSummaryResponse, YahooQuoteSummaryResult,
};

/// Public Yahoo Finance host.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Host that hands out the session cookie.
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

const PROVIDER_ID: &str = "YAHOO";

/// Modules requested from quoteSummary.
const SUMMARY_MODULES: &str =
    "price,summaryDetail,summaryProfile,financialData,defaultKeyStatistics";

/// Session cookie and the crumb issued for it.
#[derive(Clone, Debug, PartialEq)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    http: UpstreamClient,
    base_url: String,
    cookie_url: String,
    crumb: RwLock<Option<CrumbData>>,
}

impl YahooProvider {
    /// Create a provider against `base_url` (normally [`YAHOO_BASE_URL`]).
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cookie_url: YAHOO_COOKIE_URL.to_string(),
            crumb: RwLock::new(None),
        }
    }

    /// Fetch the session cookie from `cookie_url` instead of [`YAHOO_COOKIE_URL`].
    pub fn with_cookie_url(mut self, cookie_url: impl Into<String>) -> Self {
        self.cookie_url = cookie_url.into();
        self
    }

    fn quote_url(&self, symbols: &[String]) -> String {
        format!(
            "{}/v7/finance/quote?symbols={}",
            self.base_url,
            encode(&symbols.join(","))
        )
    }

    fn chart_url(&self, symbol: &str, request: &ChartRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}",
            self.base_url,
            encode(symbol),
            request.period1,
            request.period2,
            request.interval
        )
    }

    fn summary_url(&self, symbol: &str) -> String {
        format!(
            "{}/v11/finance/quoteSummary/{}?modules={}",
            self.base_url,
            encode(symbol),
            SUMMARY_MODULES
        )
    }

    fn crumb_url(&self) -> String {
        format!("{}/v1/test/getcrumb", self.base_url)
    }

    // ========================================================================
    // Crumb handling
    // ========================================================================

    fn cached_crumb(&self) -> Option<CrumbData> {
        match self.crumb.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_crumb(&self, value: Option<CrumbData>) {
        match self.crumb.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Return the cached crumb, fetching a fresh one when none is held.
    ///
    /// A failed handshake is logged and the request goes out without a
    /// crumb; Yahoo then decides whether to serve it.
    async fn ensure_crumb(&self) -> Option<CrumbData> {
        if let Some(crumb) = self.cached_crumb() {
            return Some(crumb);
        }
        match self.fetch_crumb().await {
            Ok(crumb) => Some(crumb),
            Err(e) => {
                warn!("Yahoo crumb unavailable: {}", e);
                None
            }
        }
    }

    /// Fetch a new cookie and crumb and cache them.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // fc.yahoo.com answers 404 but still sets the cookie.
        let response = self
            .http
            .inner()
            .get(&self.cookie_url)
            .send()
            .await
            .map_err(CoreError::from)?;
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(session_cookie)
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        let request = self
            .http
            .inner()
            .get(self.crumb_url())
            .header(header::COOKIE, &cookie);
        let crumb = self
            .http
            .send(PROVIDER_ID, request)
            .await?
            .text()
            .await
            .map_err(CoreError::from)?
            .trim()
            .to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(provider_error("Yahoo returned no crumb"));
        }

        debug!("Fetched Yahoo crumb");
        let data = CrumbData { cookie, crumb };
        self.store_crumb(Some(data.clone()));
        Ok(data)
    }

    /// Clear the cached crumb (used when authentication fails).
    fn clear_crumb(&self) {
        self.store_crumb(None);
    }

    /// GET an endpoint that expects the cookie and crumb.
    async fn get_authed<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        match self.try_authed(url).await {
            Err(MarketDataError::Upstream(e)) if e.is_status(401) => {
                debug!("Yahoo rejected the crumb, refreshing");
                self.clear_crumb();
                self.try_authed(url).await
            }
            result => result,
        }
    }

    async fn try_authed<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        let crumb = self.ensure_crumb().await;
        let mut request = self.http.inner().get(with_crumb(url, crumb.as_ref()));
        if let Some(crumb) = &crumb {
            request = request.header(header::COOKIE, &crumb.cookie);
        }
        let text = self
            .http
            .send(PROVIDER_ID, request)
            .await?
            .text()
            .await
            .map_err(CoreError::from)?;
        serde_json::from_str(&text).map_err(|e| CoreError::parse(PROVIDER_ID, e).into())
    }
}

/// The `name=value` pair at the head of a Set-Cookie header.
fn session_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie
        .split_once(';')
        .map_or(set_cookie, |(pair, _)| pair)
        .trim();
    pair.contains('=').then(|| pair.to_string())
}

fn with_crumb(url: &str, crumb: Option<&CrumbData>) -> String {
    match crumb {
        Some(crumb) => format!("{}&crumb={}", url, encode(&crumb.crumb)),
        None => url.to_string(),
    }
}

fn provider_error(message: &str) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl QuoteSource for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    async fn quotes(&self, symbols: &[String]) -> Result<Vec<YahooQuote>, MarketDataError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.quote_url(symbols);
        debug!("Fetching {} quotes from Yahoo", symbols.len());
        let response: YahooQuoteResponse = self.get_authed(&url).await?;
        Ok(response.quote_response.result.unwrap_or_default())
    }

    async fn chart(
        &self,
        symbol: &str,
        request: &ChartRequest,
    ) -> Result<Option<YahooChartResult>, MarketDataError> {
        let url = self.chart_url(symbol, request);
        debug!("Fetching {} chart for {}", request.interval, symbol);
        let response: YahooChartResponse = self.http.get_json(PROVIDER_ID, &url).await?;
        Ok(response
            .chart
            .result
            .and_then(|results| results.into_iter().next()))
    }

    async fn quote_summary(
        &self,
        symbol: &str,
    ) -> Result<Option<YahooQuoteSummaryResult>, MarketDataError> {
        let url = self.summary_url(symbol);
        let response: YahooQuoteSummaryResponse = self.get_authed(&url).await?;
        Ok(response
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const QUOTE_BODY: &str =
        r#"{"quoteResponse":{"result":[{"symbol":"2222.SR","regularMarketPrice":27.9}]}}"#;

    fn reply(status: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            headers,
            body.len(),
            body
        )
    }

    /// Serve canned responses chosen by `route` from the request head.
    /// Every request head seen is recorded, lowercased.
    async fn fake_yahoo<F>(route: F) -> (String, Arc<Mutex<Vec<String>>>)
    where
        F: Fn(&str, usize) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]).to_lowercase();
                let count = {
                    let mut log = log.lock().unwrap();
                    log.push(head.clone());
                    log.len()
                };
                let response = route(&head, count);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{}", addr), seen)
    }

    fn live_provider(base: &str) -> YahooProvider {
        let http = UpstreamClient::new(Duration::from_secs(5)).unwrap();
        YahooProvider::new(http, base).with_cookie_url(format!("{}/cookie", base))
    }

    fn requests_to(seen: &Arc<Mutex<Vec<String>>>, path: &str) -> Vec<String> {
        let prefix = format!("get {}", path);
        seen.lock()
            .unwrap()
            .iter()
            .filter(|head| head.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn provider() -> YahooProvider {
        let http = UpstreamClient::new(Duration::from_secs(5)).unwrap();
        YahooProvider::new(http, "https://example.test/")
    }

    #[test]
    fn test_quote_url_encodes_symbol_list() {
        let url = provider().quote_url(&["2222.SR".to_string(), "^TASI.SR".to_string()]);
        assert_eq!(
            url,
            "https://example.test/v7/finance/quote?symbols=2222.SR%2C%5ETASI.SR"
        );
    }

    #[test]
    fn test_chart_url() {
        let request = ChartRequest {
            period1: 946_684_800,
            period2: 946_771_200,
            interval: "1mo",
        };
        let url = provider().chart_url("BZ=F", &request);
        assert_eq!(
            url,
            "https://example.test/v8/finance/chart/BZ%3DF?period1=946684800&period2=946771200&interval=1mo"
        );
    }

    #[test]
    fn test_summary_url_requests_all_modules() {
        let url = provider().summary_url("AAPL");
        assert!(url.ends_with(
            "/v11/finance/quoteSummary/AAPL?modules=price,summaryDetail,summaryProfile,financialData,defaultKeyStatistics"
        ));
    }

    #[test]
    fn test_session_cookie_takes_leading_pair() {
        assert_eq!(
            session_cookie("A3=d=AQABBK&S=AQAAAp; Expires=Sun, 1 Nov 2026; Path=/; Domain=.yahoo.com"),
            Some("A3=d=AQABBK&S=AQAAAp".to_string())
        );
        assert_eq!(session_cookie("B=abc"), Some("B=abc".to_string()));
        assert_eq!(session_cookie("garbage; Path=/"), None);
    }

    #[test]
    fn test_with_crumb_appends_encoded_crumb() {
        let crumb = CrumbData {
            cookie: "A3=x".to_string(),
            crumb: "ab/cd".to_string(),
        };
        assert_eq!(
            with_crumb("https://example.test/v7/finance/quote?symbols=AAPL", Some(&crumb)),
            "https://example.test/v7/finance/quote?symbols=AAPL&crumb=ab%2Fcd"
        );
        assert_eq!(with_crumb("https://example.test/q?a=1", None), "https://example.test/q?a=1");
    }

    #[tokio::test]
    async fn test_quotes_send_cookie_and_crumb() {
        let (base, seen) = fake_yahoo(|head, _| {
            if head.starts_with("get /cookie") {
                reply("404 Not Found", "Set-Cookie: A3=sess; Path=/; Domain=.yahoo.com\r\n", "")
            } else if head.starts_with("get /v1/test/getcrumb") {
                reply("200 OK", "Content-Type: text/plain\r\n", "ab/cd")
            } else {
                reply("200 OK", "Content-Type: application/json\r\n", QUOTE_BODY)
            }
        })
        .await;
        let provider = live_provider(&base);

        let quotes = provider.quotes(&["2222.SR".to_string()]).await.unwrap();
        assert_eq!(quotes[0].regular_market_price, Some(27.9));
        provider.quotes(&["2222.SR".to_string()]).await.unwrap();

        let crumb_requests = requests_to(&seen, "/v1/test/getcrumb");
        assert_eq!(crumb_requests.len(), 1);
        assert!(crumb_requests[0].contains("cookie: a3=sess"));
        let quote_requests = requests_to(&seen, "/v7/finance/quote");
        assert_eq!(quote_requests.len(), 2);
        for head in &quote_requests {
            assert!(head.contains("&crumb=ab%2fcd"), "{}", head);
            assert!(head.contains("cookie: a3=sess"), "{}", head);
        }
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_crumb_once() {
        let (base, seen) = fake_yahoo(|head, count| {
            if head.starts_with("get /cookie") {
                reply("404 Not Found", &format!("Set-Cookie: A3=s{}; Path=/\r\n", count), "")
            } else if head.starts_with("get /v1/test/getcrumb") {
                reply("200 OK", "", &format!("c{}", count))
            } else if head.contains("&crumb=c2 ") {
                reply("401 Unauthorized", "", "")
            } else {
                reply("200 OK", "Content-Type: application/json\r\n", QUOTE_BODY)
            }
        })
        .await;
        let provider = live_provider(&base);

        let quotes = provider.quotes(&["2222.SR".to_string()]).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(requests_to(&seen, "/v1/test/getcrumb").len(), 2);
        let quote_requests = requests_to(&seen, "/v7/finance/quote");
        assert_eq!(quote_requests.len(), 2);
        assert!(quote_requests[1].contains("&crumb=c5 "));
        assert!(quote_requests[1].contains("cookie: a3=s4"));
    }

    #[tokio::test]
    async fn test_missing_cookie_still_sends_request() {
        let (base, seen) = fake_yahoo(|head, _| {
            if head.starts_with("get /cookie") {
                reply("404 Not Found", "", "")
            } else {
                reply("200 OK", "Content-Type: application/json\r\n", QUOTE_BODY)
            }
        })
        .await;
        let provider = live_provider(&base);

        let quotes = provider.quotes(&["2222.SR".to_string()]).await.unwrap();
        assert_eq!(quotes.len(), 1);
        let quote_requests = requests_to(&seen, "/v7/finance/quote");
        assert!(!quote_requests[0].contains("crumb="));
        assert!(requests_to(&seen, "/v1/test/getcrumb").is_empty());
    }
}
