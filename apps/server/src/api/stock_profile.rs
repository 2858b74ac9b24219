use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use stockhero_market_data::MarketDataError;

use super::{non_empty, with_cache_control};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const PROFILE_CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=120";

#[derive(Deserialize)]
struct ProfileQuery {
    symbol: Option<String>,
}

async fn get_stock_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Response> {
    let symbol = non_empty(query.symbol)
        .ok_or_else(|| ApiError::BadRequest("Symbol required".to_string()))?;

    match state.profile_service.profile(&symbol).await {
        Ok(profile) => Ok(with_cache_control(PROFILE_CACHE_CONTROL, Json(profile))),
        Err(MarketDataError::SymbolNotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Stock not found", "symbol": symbol })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock-profile", get(get_stock_profile))
}
