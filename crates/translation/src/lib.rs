//! Translation helpers.
//!
//! The [`Translator`] trait is the seam used by news, community and the
//! translate endpoint. [`GoogleTranslator`] talks to the keyless `gtx`
//! endpoint; tests substitute their own implementation.

mod errors;
mod google;
mod text;

pub use errors::TranslationError;
pub use google::{parse_gtx_response, GoogleTranslator, GOOGLE_TRANSLATE_URL};
pub use text::{
    chunk_paragraphs, contains_arabic, translate_arabic_to_english, translate_document,
    ARABIC_INPUT_LIMIT, CHUNK_LIMIT,
};

use async_trait::async_trait;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` (`auto` to detect) into `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;
}
