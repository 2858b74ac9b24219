use async_trait::async_trait;
use serde_json::Value;
use stockhero_core::http::UpstreamClient;
use urlencoding::encode;

use crate::{TranslationError, Translator};

pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

const UPSTREAM: &str = "google-translate";

/// Client for the public `client=gtx` translate endpoint.
pub struct GoogleTranslator {
    http: UpstreamClient,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(http: UpstreamClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, text: &str, source: &str, target: &str) -> String {
        format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.base_url,
            encode(source),
            encode(target),
            encode(text)
        )
    }
}

/// Join the translated segments of a gtx response.
///
/// The body is a nested array; `data[0]` holds `[translated, original, ..]`
/// pairs, one per sentence.
pub fn parse_gtx_response(data: &Value) -> Option<String> {
    let segments = data.get(0)?.as_array()?;
    Some(
        segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect::<String>(),
    )
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let url = self.url(text, source, target);
        let data: Value = self.http.get_json(UPSTREAM, &url).await?;
        parse_gtx_response(&data).ok_or(TranslationError::EmptyResponse)
    }
}
