use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{non_empty, with_cache_control};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const CONTENT_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate=600";

#[derive(Deserialize)]
struct ContentQuery {
    url: Option<String>,
}

/// Reader view of a news article. Fetch failures still answer 200 with a
/// link to the publisher, but only successful fetches are cacheable.
async fn get_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContentQuery>,
) -> ApiResult<Response> {
    let url = non_empty(query.url)
        .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;

    let article = state.article_service.content(&url).await;
    let body = Json(json!({ "content": article.content }));
    if article.fetched {
        Ok(with_cache_control(CONTENT_CACHE_CONTROL, body))
    } else {
        Ok(body.into_response())
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/content", get(get_content))
}
