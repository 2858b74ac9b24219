//! Groq chat completions (OpenAI-compatible wire format).

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use stockhero_core::http::UpstreamClient;

use crate::error::AiError;

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// A chat completion backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Content of the first choice, if the provider returned one.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, AiError>;
}

pub struct GroqClient {
    http: UpstreamClient,
    url: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(http: UpstreamClient, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, AiError> {
        debug!("Sending chat completion to {} ({})", self.url, request.model);
        let builder = self
            .http
            .inner()
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request);
        let response = self.http.send("groq", builder).await?;
        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::provider(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }
}
