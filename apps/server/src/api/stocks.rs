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

const STOCKS_CACHE_CONTROL: &str = "s-maxage=15, stale-while-revalidate=10";

#[derive(Deserialize)]
struct StocksQuery {
    market: Option<String>,
}

/// Failed batches are skipped inside the service, so this always renders.
async fn get_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StocksQuery>,
) -> Response {
    let stocks = state
        .stock_list_service
        .list(query.market.as_deref())
        .await;
    tracing::debug!("Serving {} stocks", stocks.len());
    with_cache_control(STOCKS_CACHE_CONTROL, Json(stocks))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stocks", get(get_stocks))
}
