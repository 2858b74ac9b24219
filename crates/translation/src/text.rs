//! Text-level helpers built on a [`Translator`].

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::{TranslationError, Translator};

/// Chunks are kept below this many characters.
pub const CHUNK_LIMIT: usize = 1500;

/// Arabic input longer than this is truncated before translation.
pub const ARABIC_INPUT_LIMIT: usize = 2000;

lazy_static! {
    static ref NEWLINE_RUN: Regex = Regex::new(r"\n+").expect("valid newline regex");
}

/// True when the text has at least one character in the Arabic block.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Translate Arabic text to English, returning the input unchanged when it
/// has no Arabic or the translation fails.
pub async fn translate_arabic_to_english(translator: &dyn Translator, text: &str) -> String {
    if text.is_empty() || !contains_arabic(text) {
        return text.to_string();
    }
    let input: String = text.chars().take(ARABIC_INPUT_LIMIT).collect();
    match translator.translate(&input, "ar", "en").await {
        Ok(translated) if !translated.is_empty() => translated,
        Ok(_) => text.to_string(),
        Err(e) => {
            debug!("Arabic translation failed, keeping original: {}", e);
            text.to_string()
        }
    }
}

/// Split on newline runs and pack paragraphs into chunks.
///
/// A paragraph joins the current chunk while the combined length stays
/// under `limit`; every paragraph is followed by a blank line. Blank
/// chunks are dropped.
pub fn chunk_paragraphs(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in NEWLINE_RUN.split(text) {
        let paragraph_len = paragraph.chars().count();
        if current_len + paragraph_len >= limit {
            if !current.trim().is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.clear();
            current_len = 0;
        }
        current.push_str(paragraph);
        current.push_str("\n\n");
        current_len += paragraph_len + 2;
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Translate a long document chunk by chunk into `target`.
///
/// A chunk the service rejects or returns empty is kept as is. Transport
/// failures abort the whole document.
pub async fn translate_document(
    translator: &dyn Translator,
    text: &str,
    target: &str,
) -> Result<String, TranslationError> {
    let chunks = chunk_paragraphs(text, CHUNK_LIMIT);
    let mut translated = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        match translator.translate(&chunk, "auto", target).await {
            Ok(result) => translated.push(result),
            Err(e) if e.is_rejected() || matches!(e, TranslationError::EmptyResponse) => {
                warn!("Chunk translation rejected, keeping source text: {}", e);
                translated.push(chunk);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(translated.join("\n\n"))
}
