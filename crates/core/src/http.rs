//! Upstream HTTP client.
//!
//! All third-party calls go through one `reqwest::Client` that presents a
//! desktop browser User-Agent. A non-success status is reported as
//! [`Error::UpstreamStatus`] so callers can treat it as "no data".

use std::time::Duration;

use log::debug;
use reqwest::header;
use serde::de::DeserializeOwned;

use crate::errors::{Error, Result};

pub use reqwest::Url;

/// User-Agent sent with every upstream request.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Accept header used when scraping HTML pages.
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Raw body plus its declared content type.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parse `raw` as an absolute `http` or `https` URL.
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(Error::InvalidUrl(format!("unsupported scheme {:?}", scheme))),
    }
}

/// Thin wrapper over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Access the underlying client for requests that need custom handling.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET a URL and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, upstream: &str, url: &str) -> Result<T> {
        let response = self.send(upstream, self.client.get(url)).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| Error::parse(upstream, e))
    }

    /// GET a URL and return the body as text.
    pub async fn get_text(&self, upstream: &str, url: &str, accept: Option<&str>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }
        let response = self.send(upstream, request).await?;
        Ok(response.text().await?)
    }

    /// GET an HTML page presenting `user_agent` instead of the browser one.
    pub async fn get_page(&self, upstream: &str, url: Url, user_agent: &str) -> Result<String> {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, user_agent)
            .header(header::ACCEPT, "text/html,application/xhtml+xml");
        let response = self.send(upstream, request).await?;
        Ok(response.text().await?)
    }

    /// GET an image, streaming at most `max_bytes` of body.
    ///
    /// A declared content type other than `image/*` is refused before the
    /// body is read. A missing content type is let through.
    pub async fn get_image(
        &self,
        upstream: &str,
        url: Url,
        max_bytes: usize,
    ) -> Result<FetchedBody> {
        let mut response = self.send(upstream, self.client.get(url)).await?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(kind) = content_type.as_deref() {
            if !kind.trim().to_ascii_lowercase().starts_with("image/") {
                return Err(Error::NotAnImage(kind.to_string()));
            }
        }

        let too_large = || Error::BodyTooLarge {
            upstream: upstream.to_string(),
            limit: max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(FetchedBody {
            content_type,
            bytes,
        })
    }

    /// Send a prepared request, mapping non-success statuses to errors.
    pub async fn send(
        &self,
        upstream: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{} responded with {}", upstream, status);
            return Err(Error::UpstreamStatus {
                upstream: upstream.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
