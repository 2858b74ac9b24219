use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stockhero_ai::{generate_insight, Insight, StockSnapshot};

use super::{non_empty, with_cache_control};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const INSIGHT_CACHE_CONTROL: &str = "s-maxage=300, stale-while-revalidate=60";

#[derive(Deserialize)]
struct InsightQuery {
    symbol: Option<String>,
}

/// Older clients read the insight fields from the top level.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightResponse {
    success: bool,
    symbol: String,
    stock_data: StockSnapshot,
    insight: Insight,
    #[serde(flatten)]
    top_level: Insight,
}

async fn get_insight(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InsightQuery>,
) -> ApiResult<Response> {
    let symbol = non_empty(query.symbol)
        .ok_or_else(|| ApiError::BadRequest("Symbol required".to_string()))?;

    let quote = match state.quote_source.quote(&symbol).await {
        Ok(Some(quote)) => quote,
        Ok(None) => return Err(ApiError::NotFound("Stock not found".to_string())),
        Err(e) => {
            tracing::warn!("Quote fetch failed for {}: {}", symbol, e);
            return Err(ApiError::Upstream("Failed to fetch stock data".to_string()));
        }
    };

    let stock_data = StockSnapshot::from_quote(&symbol, &quote);
    let insight = generate_insight(&stock_data, state.clock.now());

    Ok(with_cache_control(
        INSIGHT_CACHE_CONTROL,
        Json(InsightResponse {
            success: true,
            symbol,
            stock_data,
            top_level: insight.clone(),
            insight,
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ai-insight", get(get_insight))
}
