use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stockhero_market_data::chart::ChartPoint;

use super::{non_empty, with_cache_control};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const CHART_CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=30";
const DEFAULT_RANGE: &str = "1D";

#[derive(Deserialize)]
struct ChartQuery {
    symbol: Option<String>,
    range: Option<String>,
}

/// Body returned when every chart strategy came back empty.
#[derive(Serialize)]
struct ChartUnavailable {
    symbol: String,
    currency: &'static str,
    quotes: Vec<ChartPoint>,
    error: String,
}

async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Response> {
    let symbol = non_empty(query.symbol)
        .ok_or_else(|| ApiError::BadRequest("Symbol required".to_string()))?;
    let range = non_empty(query.range).unwrap_or_else(|| DEFAULT_RANGE.to_string());

    let response = match state.chart_service.series(&symbol, &range).await {
        Some(series) => with_cache_control(CHART_CACHE_CONTROL, Json(series)),
        None => with_cache_control(
            CHART_CACHE_CONTROL,
            Json(ChartUnavailable {
                error: format!("Chart data unavailable for {}", symbol),
                symbol,
                currency: "USD",
                quotes: Vec::new(),
            }),
        ),
    };
    Ok(response)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chart", get(get_chart))
}
