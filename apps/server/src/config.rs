use std::{net::SocketAddr, time::Duration};

use stockhero_ai::GROQ_CHAT_URL;
use stockhero_community::SYNDICATION_URL;
use stockhero_market_data::{YAHOO_BASE_URL, YAHOO_COOKIE_URL};
use stockhero_news::{BING_NEWS_URL, GOOGLE_NEWS_URL, READER_URL};
use stockhero_translation::GOOGLE_TRANSLATE_URL;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PLATFORM: &str = "stockhero-server";
const DEFAULT_IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
    pub upstream_timeout: Duration,
    pub news_cache_ttl: Duration,
    pub community_cache_ttl: Duration,
    /// Largest image body relayed by `/api/proxy-image`.
    pub image_max_bytes: usize,
    pub yahoo_base_url: String,
    pub yahoo_cookie_url: String,
    pub bing_news_url: String,
    pub google_news_url: String,
    pub translate_url: String,
    pub syndication_url: String,
    /// Reader proxy tried for paywalled or script-rendered articles.
    pub reader_url: String,
    pub groq_url: String,
    /// Chat runs in demo mode without a key.
    pub groq_api_key: Option<String>,
    /// Label echoed by `/api/debug`.
    pub platform: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Read the process environment. `.env` is loaded once by the binary.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let raw_addr = text("SH_LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = match raw_addr.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(
                    "Invalid SH_LISTEN_ADDR {:?} ({}), using {}",
                    raw_addr,
                    e,
                    DEFAULT_LISTEN_ADDR
                );
                SocketAddr::from(([0, 0, 0, 0], 8080))
            }
        };

        Self {
            listen_addr,
            request_timeout: Duration::from_millis(number("SH_REQUEST_TIMEOUT_MS", 30_000)),
            upstream_timeout: Duration::from_millis(number("SH_UPSTREAM_TIMEOUT_MS", 15_000)),
            news_cache_ttl: Duration::from_secs(number("SH_NEWS_CACHE_TTL_SECS", 600)),
            community_cache_ttl: Duration::from_secs(number("SH_COMMUNITY_CACHE_TTL_SECS", 600)),
            image_max_bytes: number("SH_IMAGE_MAX_BYTES", DEFAULT_IMAGE_MAX_BYTES) as usize,
            yahoo_base_url: text("SH_YAHOO_BASE_URL", YAHOO_BASE_URL),
            yahoo_cookie_url: text("SH_YAHOO_COOKIE_URL", YAHOO_COOKIE_URL),
            bing_news_url: text("SH_BING_NEWS_URL", BING_NEWS_URL),
            google_news_url: text("SH_GOOGLE_NEWS_URL", GOOGLE_NEWS_URL),
            translate_url: text("SH_TRANSLATE_URL", GOOGLE_TRANSLATE_URL),
            syndication_url: text("SH_SYNDICATION_URL", SYNDICATION_URL),
            reader_url: text("SH_READER_URL", READER_URL),
            groq_url: text("SH_GROQ_URL", GROQ_CHAT_URL),
            groq_api_key: lookup("GROQ_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            platform: text("SH_PLATFORM", DEFAULT_PLATFORM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        assert_eq!(config.upstream_timeout, Duration::from_millis(15_000));
        assert_eq!(config.news_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.community_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.image_max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.yahoo_base_url, YAHOO_BASE_URL);
        assert_eq!(config.yahoo_cookie_url, YAHOO_COOKIE_URL);
        assert_eq!(config.groq_url, GROQ_CHAT_URL);
        assert_eq!(config.reader_url, READER_URL);
        assert!(config.groq_api_key.is_none());
        assert_eq!(config.platform, "stockhero-server");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SH_LISTEN_ADDR", "127.0.0.1:9000"),
            ("SH_NEWS_CACHE_TTL_SECS", "60"),
            ("SH_YAHOO_BASE_URL", "http://localhost:1234"),
            ("GROQ_API_KEY", "gsk_test"),
        ]);
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.news_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.yahoo_base_url, "http://localhost:1234");
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk_test"));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("SH_PLATFORM", "process-env");
        let config = Config::from_env();
        std::env::remove_var("SH_PLATFORM");
        assert_eq!(config.platform, "process-env");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("SH_LISTEN_ADDR", "not-an-address"),
            ("SH_REQUEST_TIMEOUT_MS", "soon"),
            ("GROQ_API_KEY", "  "),
        ]);
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        assert!(config.groq_api_key.is_none());
    }
}
