use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use stockhero_translation::translate_document;

use super::{method_not_allowed, non_empty};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const DEFAULT_TARGET: &str = "ar";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateBody {
    text: Option<String>,
    target_lang: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// On failure the caller gets its own text back.
async fn post_translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> ApiResult<Json<TranslateResponse>> {
    let text =
        non_empty(body.text).ok_or_else(|| ApiError::BadRequest("Text required".to_string()))?;
    let target = non_empty(body.target_lang).unwrap_or_else(|| DEFAULT_TARGET.to_string());

    let translated_text = match translate_document(state.translator.as_ref(), &text, &target).await
    {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!("Translation failed, returning source text: {}", e);
            text
        }
    };
    Ok(Json(TranslateResponse { translated_text }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/translate",
        post(post_translate).fallback(method_not_allowed),
    )
}
