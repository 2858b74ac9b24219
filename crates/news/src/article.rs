//! Readable article text for the in-app reader.
//!
//! The page is fetched as Googlebot, boilerplate is ignored and the
//! paragraphs of the first recognised article container are kept. Thin
//! pages are retried through a reader proxy. Whatever happens the caller
//! gets displayable HTML, at worst a link back to the publisher.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use quick_xml::escape::escape;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use stockhero_core::http::{parse_http_url, UpstreamClient, Url};
use tracing::{info, warn};
use urlencoding::encode;

use crate::errors::NewsError;

pub const READER_URL: &str = "https://12ft.io/api/proxy";

const GOOGLEBOT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 5X Build/MMB29P) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/W.X.Y.Z Mobile Safari/537.36 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Paragraphs inside an article container must be longer than this.
const MIN_PASSAGE: usize = 40;
/// Stop trying further containers once this much was collected.
const ENOUGH_CONTENT: usize = 500;
/// Below this the page-wide sentence scan and the reader proxy kick in.
const THIN_CONTENT: usize = 200;
/// Below this the article is reported as unreadable.
const MIN_CONTENT: usize = 100;
const MIN_LOOSE_PARAGRAPH: usize = 60;

/// Article containers, most specific first.
const ARTICLE_ROOTS: &[&str] = &[
    "#articleBody",
    ".article-body",
    ".td-post-content",
    ".details-body",
    ".article-text",
    ".WYSIWYG.articlePage",
    "#article",
    "[data-test-id=\"post-content\"]",
    ".caas-body",
    ".news-details",
    ".ArticleBody",
    ".story-text",
    ".story-content",
    "article",
    ".main-content",
    "main",
];

const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];
const NOISE_CLASSES: &[&str] = &[
    "ad",
    "advertisement",
    "social-share",
    "related-articles",
    "secondary-content",
];

/// Anchor texts that point at the real article, in priority order.
const READ_MORE: &[&str] = &["Read the full article", "Continue reading", "View full article"];

lazy_static! {
    static ref ROOT_SELECTORS: Vec<Selector> = ARTICLE_ROOTS
        .iter()
        .map(|s| Selector::parse(s).expect("Invalid selector"))
        .collect();
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("Invalid selector");
    static ref LINK: Selector = Selector::parse("a").expect("Invalid selector");
    static ref SENTENCE_START: Regex = Regex::new(r#"^[A-Z"']"#).expect("Invalid regex pattern");
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]$").expect("Invalid regex pattern");
}

fn is_noise(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    NOISE_TAGS.contains(&value.name()) || value.classes().any(|c| NOISE_CLASSES.contains(&c))
}

fn inside_noise(element: ElementRef<'_>) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|e| is_noise(&e))
}

fn paragraph_text(paragraph: ElementRef<'_>) -> String {
    paragraph.text().collect::<String>().trim().to_string()
}

fn push_paragraph(content: &mut String, text: &str) {
    content.push_str("<p>");
    content.push_str(&escape(text));
    content.push_str("</p>");
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Article paragraphs of `html` as `<p>…</p>` markup, possibly empty.
pub fn extract_article(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut content = String::new();

    for selector in ROOT_SELECTORS.iter() {
        let roots: Vec<ElementRef<'_>> = document
            .select(selector)
            .filter(|root| !inside_noise(*root))
            .collect();
        if roots.is_empty() {
            continue;
        }
        for root in roots {
            for paragraph in root.select(&PARAGRAPH) {
                if inside_noise(paragraph) {
                    continue;
                }
                let text = paragraph_text(paragraph);
                if char_len(&text) > MIN_PASSAGE {
                    push_paragraph(&mut content, &text);
                }
            }
        }
        if char_len(&content) > ENOUGH_CONTENT {
            break;
        }
    }

    if char_len(&content) < THIN_CONTENT {
        for paragraph in document.select(&PARAGRAPH) {
            if inside_noise(paragraph) {
                continue;
            }
            let text = paragraph_text(paragraph);
            if char_len(&text) > MIN_LOOSE_PARAGRAPH
                && SENTENCE_START.is_match(&text)
                && SENTENCE_END.is_match(&text)
                && !text.contains("Copyright")
                && !text.contains("Rights Reserved")
            {
                push_paragraph(&mut content, &text);
            }
        }
    }

    content
}

/// Absolute target of a "read the full article" style link.
pub fn read_more_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    READ_MORE
        .iter()
        .find_map(|phrase| {
            document
                .select(&LINK)
                .find(|a| a.text().collect::<String>().contains(phrase))
                .and_then(|a| a.value().attr("href"))
        })
        .filter(|href| href.starts_with("http"))
        .map(str::to_string)
}

/// Host of `url` without a leading `www.`.
pub fn publisher_of(url: &str, default: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|host| host.replacen("www.", "", 1)))
        .unwrap_or_else(|| default.to_string())
}

/// Call-to-action linking back to the publisher.
pub fn original_link(url: &str, publisher: &str) -> String {
    format!(
        "<p style=\"margin-top: 1rem; padding: 1rem; background: #f8fafc; border-radius: 12px; text-align: center;\">\
         <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"color: #0D85D8; font-weight: 600; text-decoration: none; display: inline-flex; align-items: center; gap: 0.5rem;\">\
         📰 Read full article on {} →</a></p>",
        escape(url),
        escape(publisher)
    )
}

/// Fetches raw HTML pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, NewsError>;
}

/// Live pages over HTTP(S), requested as Googlebot.
pub struct WebPages {
    http: UpstreamClient,
}

impl WebPages {
    pub fn new(http: UpstreamClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PageSource for WebPages {
    async fn fetch(&self, url: &str) -> Result<String, NewsError> {
        let url = parse_http_url(url)?;
        Ok(self
            .http
            .get_page("article", url, GOOGLEBOT_USER_AGENT)
            .await?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleContent {
    pub content: String,
    /// False when the page could not be fetched at all.
    pub fetched: bool,
}

pub struct ArticleService {
    pages: Arc<dyn PageSource>,
    reader_url: String,
}

impl ArticleService {
    pub fn new(pages: Arc<dyn PageSource>, reader_url: impl Into<String>) -> Self {
        Self {
            pages,
            reader_url: reader_url.into(),
        }
    }

    /// Displayable HTML for the article at `url`. Never fails.
    pub async fn content(&self, url: &str) -> ArticleContent {
        match self.extract(url).await {
            Ok(content) => ArticleContent {
                content,
                fetched: true,
            },
            Err(e) => {
                warn!("Article fetch failed for {}: {}", url, e);
                ArticleContent {
                    content: format!(
                        "<p>Unable to load content automatically.</p>{}",
                        original_link(url, &publisher_of(url, "the original source"))
                    ),
                    fetched: false,
                }
            }
        }
    }

    async fn extract(&self, url: &str) -> Result<String, NewsError> {
        let mut html = self.pages.fetch(url).await?;
        if let Some(next) = read_more_link(&html) {
            info!("Following read-more link to {}", next);
            html = self.pages.fetch(&next).await?;
        }

        let mut content = extract_article(&html);
        if char_len(&content) < THIN_CONTENT {
            let reader = format!("{}?q={}", self.reader_url, encode(url));
            match self.pages.fetch(&reader).await {
                Ok(page) => {
                    let alternative = extract_article(&page);
                    if char_len(&alternative) > char_len(&content) {
                        content = alternative;
                    }
                }
                Err(e) => warn!("Reader proxy failed for {}: {}", url, e),
            }
        }

        if char_len(&content) < MIN_CONTENT {
            content = format!(
                "<p>This article requires JavaScript or is behind a paywall.</p>{}",
                original_link(url, &publisher_of(url, "the source"))
            );
        }
        Ok(content)
    }
}
