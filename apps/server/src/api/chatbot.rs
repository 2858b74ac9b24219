use std::sync::Arc;

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use stockhero_ai::{ChatReply, HistoryEntry};

use super::{method_not_allowed, non_empty};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody {
    message: Option<String>,
    stock_data: Option<Value>,
    conversation_history: Option<Vec<HistoryEntry>>,
}

/// An unreadable body is answered in-band so the chat UI can show it.
async fn post_chat(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<ChatReply>> {
    let body: ChatBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Unreadable chatbot request: {}", e);
            return Ok(Json(ChatReply::technical_difficulties(e.to_string())));
        }
    };
    let message = non_empty(body.message)
        .ok_or_else(|| ApiError::BadRequest("Message required".to_string()))?;
    let stock_data = body.stock_data.filter(|v| !v.is_null());
    let history = body.conversation_history.unwrap_or_default();

    let reply = state
        .chat_service
        .reply(&message, stock_data.as_ref(), &history)
        .await;
    Ok(Json(reply))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chatbot", post(post_chat).fallback(method_not_allowed))
}
