use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stockhero_community::{demo_tweets, Tweet, ACCOUNTS};

use super::with_cache_control;
use crate::main_lib::AppState;

const COMMUNITY_CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=30";

#[derive(Deserialize)]
struct CommunityQuery {
    tab: Option<String>,
    refresh: Option<String>,
}

#[derive(Serialize)]
struct CommunityFailure {
    success: bool,
    error: String,
    tweets: Vec<Tweet>,
    accounts: usize,
}

async fn get_community(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommunityQuery>,
) -> Response {
    let refresh = query.refresh.is_some_and(|r| !r.is_empty());

    match state
        .community_service
        .feed(query.tab.as_deref(), refresh)
        .await
    {
        Ok(feed) => with_cache_control(COMMUNITY_CACHE_CONTROL, Json(feed)),
        Err(e) => {
            tracing::error!("Community feed failed: {}", e);
            with_cache_control(
                COMMUNITY_CACHE_CONTROL,
                Json(CommunityFailure {
                    success: false,
                    error: e.to_string(),
                    tweets: demo_tweets(state.clock.now()),
                    accounts: ACCOUNTS.len(),
                }),
            )
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/x-community", get(get_community))
}
