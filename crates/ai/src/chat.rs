//! Hero Ai chat assistant.
//!
//! Without an API key every message gets a canned demo reply and nothing
//! leaves the process. With a key the message goes to the model; a refused
//! request degrades to general guidance and a broken one to an apology.

use std::sync::Arc;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::groq::{ChatCompletion, ChatMessage, ChatRequest, GROQ_MODEL};
use crate::symbols::extract_symbols;

pub const SYSTEM_PROMPT: &str = r#"You are "Hero Ai", an expert financial assistant specializing in the Saudi Arabian stock market (TASI/Tadawul), Egyptian stock market (EGX), and global markets.

Your expertise includes:
- Stock analysis (fundamental & technical)
- Market trends and predictions
- Investment strategies and portfolio advice
- Company financial analysis
- Trading recommendations
- Risk assessment

Guidelines:
1. Be concise but informative (2-4 paragraphs max)
2. When stock data is provided, reference specific numbers
3. Always mention risks with recommendations
4. Be helpful and encouraging to investors
5. Use emojis sparingly for key points (📈 📉 💡 ⚠️ 🎯)
6. Format responses clearly with **bold** for emphasis
7. If you don't have specific data, provide general guidance
8. Never give guaranteed predictions - markets are unpredictable

Key Saudi Stocks:
- 2222 (Aramco), 1120 (Al Rajhi), 2010 (SABIC), 7010 (STC), 2082 (ACWA Power)

Respond in a friendly, professional manner as a trusted financial advisor named Hero Ai."#;

/// Model label reported on successful replies.
const REPLY_MODEL: &str = "llama-3.3-70b";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;
const EMPTY_COMPLETION: &str = "I apologize, I could not generate a response.";
/// Earlier turns replayed to the model.
const HISTORY_TURNS: usize = 6;

/// One earlier turn as the chat UI keeps it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    /// `"user"` for the person, anything else for the assistant.
    pub sender: Option<String>,
    pub text: Option<String>,
}

impl HistoryEntry {
    fn to_message(&self) -> Option<ChatMessage> {
        let text = self.text.as_deref().filter(|t| !t.is_empty())?;
        Some(match self.sender.as_deref() {
            Some("user") => ChatMessage::user(text),
            _ => ChatMessage::assistant(text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn head(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

impl ChatReply {
    pub fn demo(message: &str) -> Self {
        Self {
            message: format!(
                "Thanks for your question about \"{}...\". I'm Hero Ai, your financial assistant! 📈\n\n\
                 I'm currently in demo mode. For full AI-powered responses, please configure the GROQ_API_KEY environment variable.\n\n\
                 💡 **Tip**: Always do your own research before making investment decisions.",
                head(message, 50)
            ),
            model: Some("demo".to_string()),
            symbols: None,
            error: None,
        }
    }

    pub fn fallback(message: &str) -> Self {
        Self {
            message: format!(
                "I understand you're asking about \"{}...\". Let me provide some general guidance.\n\n\
                 📈 For Saudi stocks, always check the TASI index for overall market direction.\n\n\
                 ⚠️ Remember: Past performance doesn't guarantee future results. Consider your risk tolerance before investing.",
                head(message, 30)
            ),
            model: Some("fallback".to_string()),
            symbols: None,
            error: None,
        }
    }

    /// Reply used when the request could not be handled at all.
    pub fn technical_difficulties(error: impl Into<String>) -> Self {
        Self {
            message: "I'm experiencing some technical difficulties. Please try again in a moment.\n\n\
                      💡 In the meantime, you can check the News Feed or Market Summary for the latest updates."
                .to_string(),
            model: None,
            symbols: None,
            error: Some(error.into()),
        }
    }
}

pub struct ChatService {
    completion: Option<Arc<dyn ChatCompletion>>,
}

impl ChatService {
    /// `None` puts the assistant in demo mode.
    pub fn new(completion: Option<Arc<dyn ChatCompletion>>) -> Self {
        Self { completion }
    }

    pub fn is_demo(&self) -> bool {
        self.completion.is_none()
    }

    /// Build the completion request for `message`: the system prompt, the
    /// last six turns of `history`, then the message itself.
    pub fn request(
        message: &str,
        stock_data: Option<&Value>,
        history: &[HistoryEntry],
    ) -> ChatRequest {
        let mut system = SYSTEM_PROMPT.to_string();
        if let Some(data) = stock_data {
            let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            system.push_str("\n\nREAL-TIME STOCK DATA:\n");
            system.push_str(&pretty);
        }
        let recent = &history[history.len().saturating_sub(HISTORY_TURNS)..];
        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(recent.iter().filter_map(HistoryEntry::to_message));
        messages.push(ChatMessage::user(message));

        ChatRequest {
            model: GROQ_MODEL.to_string(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub async fn reply(
        &self,
        message: &str,
        stock_data: Option<&Value>,
        history: &[HistoryEntry],
    ) -> ChatReply {
        let Some(completion) = self.completion.as_ref() else {
            info!("Chat in demo mode, no model configured");
            return ChatReply::demo(message);
        };

        match completion
            .complete(&Self::request(message, stock_data, history))
            .await {
            Ok(content) => ChatReply {
                message: content
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| EMPTY_COMPLETION.to_string()),
                model: Some(REPLY_MODEL.to_string()),
                symbols: Some(extract_symbols(message)),
                error: None,
            },
            Err(e) if e.is_rejected() => {
                warn!("Chat completion refused: {}", e);
                ChatReply::fallback(message)
            }
            Err(e) => {
                error!("Chat completion failed: {}", e);
                ChatReply::technical_difficulties(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use stockhero_core::Error as CoreError;

    enum Outcome {
        Content(Option<&'static str>),
        Status(u16),
        Broken,
    }

    struct FakeModel {
        outcome: Outcome,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl FakeModel {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatCompletion for FakeModel {
        async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, AiError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.outcome {
                Outcome::Content(content) => Ok(content.map(str::to_string)),
                Outcome::Status(status) => Err(AiError::Upstream(CoreError::UpstreamStatus {
                    upstream: "groq".to_string(),
                    status,
                })),
                Outcome::Broken => Err(AiError::provider("truncated body")),
            }
        }
    }

    #[tokio::test]
    async fn test_demo_mode() {
        let chat = ChatService::new(None);
        assert!(chat.is_demo());
        let reply = chat.reply(&"x".repeat(80), None, &[]).await;
        assert_eq!(reply.model.as_deref(), Some("demo"));
        assert!(reply
            .message
            .starts_with(&format!("Thanks for your question about \"{}...\"", "x".repeat(50))));
        assert!(reply.symbols.is_none());
    }

    #[tokio::test]
    async fn test_success_with_stock_context() {
        let model = FakeModel::new(Outcome::Content(Some("Aramco looks steady.")));
        let chat = ChatService::new(Some(model.clone()));

        let data = json!({"symbol": "2222.SR", "price": 28.5});
        let reply = chat.reply("How is Aramco doing?", Some(&data), &[]).await;
        assert_eq!(reply.message, "Aramco looks steady.");
        assert_eq!(reply.model.as_deref(), Some("llama-3.3-70b"));
        assert_eq!(reply.symbols, Some(vec!["2222.SR".to_string()]));

        let requests = model.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.max_tokens, 500);
        assert!(request.messages[0].content.starts_with("You are \"Hero Ai\""));
        assert!(request.messages[0]
            .content
            .ends_with("REAL-TIME STOCK DATA:\n{\n  \"price\": 28.5,\n  \"symbol\": \"2222.SR\"\n}"));
        assert_eq!(request.messages[1], ChatMessage::user("How is Aramco doing?"));
    }

    fn turn(sender: &str, text: &str) -> HistoryEntry {
        HistoryEntry {
            sender: Some(sender.to_string()),
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn test_request_replays_recent_history_in_order() {
        let history: Vec<HistoryEntry> = (1..=8)
            .map(|i| {
                if i % 2 == 1 {
                    turn("user", &format!("question {}", i))
                } else {
                    turn("bot", &format!("answer {}", i))
                }
            })
            .collect();

        let request = ChatService::request("And SABIC?", None, &history);
        let messages: Vec<(&str, &str)> = request
            .messages
            .iter()
            .map(|m| (m.role.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(messages.len(), 8);
        assert_eq!(messages[0].0, "system");
        assert_eq!(
            &messages[1..],
            &[
                ("user", "question 3"),
                ("assistant", "answer 4"),
                ("user", "question 5"),
                ("assistant", "answer 6"),
                ("user", "question 7"),
                ("assistant", "answer 8"),
                ("user", "And SABIC?"),
            ]
        );
    }

    #[test]
    fn test_request_skips_empty_turns() {
        let history = vec![
            turn("user", ""),
            HistoryEntry::default(),
            turn("assistant", "Aramco closed flat."),
        ];
        let request = ChatService::request("Why?", None, &history);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1], ChatMessage::assistant("Aramco closed flat."));
        assert_eq!(request.messages[2], ChatMessage::user("Why?"));
    }

    #[tokio::test]
    async fn test_empty_completion() {
        let chat = ChatService::new(Some(FakeModel::new(Outcome::Content(Some("")))));
        let reply = chat.reply("hi", None, &[]).await;
        assert_eq!(reply.message, EMPTY_COMPLETION);
    }

    #[tokio::test]
    async fn test_rejected_request_falls_back() {
        let chat = ChatService::new(Some(FakeModel::new(Outcome::Status(429))));
        let reply = chat.reply("Tell me about the market today", None, &[]).await;
        assert_eq!(reply.model.as_deref(), Some("fallback"));
        assert!(reply
            .message
            .starts_with("I understand you're asking about \"Tell me about the market today...\""));
    }

    #[tokio::test]
    async fn test_broken_response_apologizes() {
        let chat = ChatService::new(Some(FakeModel::new(Outcome::Broken)));
        let reply = chat.reply("hi", None, &[]).await;
        assert!(reply.model.is_none());
        assert_eq!(reply.error.as_deref(), Some("Provider error: truncated body"));
        assert!(reply.message.starts_with("I'm experiencing some technical difficulties"));
    }
}
