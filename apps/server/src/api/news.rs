use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::with_cache_control;
use crate::main_lib::AppState;

const NEWS_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=60";

#[derive(Deserialize)]
struct NewsQuery {
    market: Option<String>,
}

async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    let articles = state.news_service.articles(query.market.as_deref()).await;
    with_cache_control(NEWS_CACHE_CONTROL, Json(articles))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/news", get(get_news))
}
