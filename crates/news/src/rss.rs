//! Minimal RSS 2.0 item reader.
//!
//! Only the fields the news feeds consume are collected. Text and CDATA
//! content are both accepted; channel-level elements are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::Html;

use crate::errors::NewsError;

/// One `<item>` as found in the feed, untrimmed of nothing but whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    /// Text of a `<news:source>` element (Bing).
    pub news_source: Option<String>,
    /// Text of a plain `<source>` element (Google).
    pub source: Option<String>,
    /// First `source="…"` attribute seen inside the item.
    pub source_attr: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
    NewsSource,
    Source,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Description),
            b"pubDate" => Some(Self::PubDate),
            b"news:source" => Some(Self::NewsSource),
            b"source" => Some(Self::Source),
            _ => None,
        }
    }
}

impl RssItem {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::PubDate => &mut self.pub_date,
            Field::NewsSource => &mut self.news_source,
            Field::Source => &mut self.source,
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        self.slot(field).get_or_insert_with(String::new).push_str(text);
    }

    fn capture_source_attr(&mut self, element: &BytesStart<'_>) {
        if self.source_attr.is_some() {
            return;
        }
        self.source_attr = element
            .attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == b"source")
            .map(|attr| match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            });
    }

    fn finish(mut self) -> Self {
        for field in [
            Field::Title,
            Field::Link,
            Field::Description,
            Field::PubDate,
            Field::NewsSource,
            Field::Source,
        ] {
            let slot = self.slot(field);
            *slot = slot
                .take()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
        }
        self
    }
}

/// Parse every `<item>` of an RSS document.
pub fn parse_items(xml: &str) -> Result<Vec<RssItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut items = Vec::new();
    let mut item: Option<RssItem> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = element.name();
                if name.as_ref() == b"item" {
                    item = Some(RssItem::default());
                    field = None;
                } else if let Some(current) = item.as_mut() {
                    current.capture_source_attr(&element);
                    if field.is_none() {
                        field = Field::from_name(name.as_ref());
                    }
                }
            }
            Event::Empty(element) => {
                if let Some(current) = item.as_mut() {
                    current.capture_source_attr(&element);
                }
            }
            Event::Text(text) => {
                if let (Some(current), Some(f)) = (item.as_mut(), field) {
                    // Unknown entities (HTML's &nbsp; and friends) keep the raw text.
                    let value = match text.unescape() {
                        Ok(value) => value.into_owned(),
                        Err(_) => String::from_utf8_lossy(&text).into_owned(),
                    };
                    current.append(f, &value);
                }
            }
            Event::CData(data) => {
                if let (Some(current), Some(f)) = (item.as_mut(), field) {
                    current.append(f, &String::from_utf8_lossy(&data));
                }
            }
            Event::End(element) => {
                let name = element.name();
                if name.as_ref() == b"item" {
                    if let Some(done) = item.take() {
                        items.push(done.finish());
                    }
                    field = None;
                } else if field.is_some() && Field::from_name(name.as_ref()) == field {
                    field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Visible text of an HTML fragment.
pub fn strip_html(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    document.root_element().text().collect::<String>()
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
