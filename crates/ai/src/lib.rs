//! Stock Hero AI.
//!
//! - `insight`: rule-based commentary on a single quote
//! - `groq`: OpenAI-compatible chat completion client for Groq
//! - `chat`: the Hero Ai assistant with demo and fallback replies
//! - `symbols`: keyword to ticker lookup used to tag chat replies

pub mod chat;
pub mod error;
pub mod groq;
pub mod insight;
pub mod symbols;

pub use chat::{ChatReply, ChatService, HistoryEntry, SYSTEM_PROMPT};
pub use error::AiError;
pub use groq::{ChatCompletion, ChatMessage, ChatRequest, GroqClient, GROQ_CHAT_URL, GROQ_MODEL};
pub use insight::{generate_insight, Insight, StockSnapshot};
pub use symbols::extract_symbols;
