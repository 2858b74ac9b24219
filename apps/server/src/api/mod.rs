use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiError, main_lib::AppState};

mod ai_insight;
mod chart;
mod chatbot;
mod content;
mod cors;
mod debug;
mod health;
mod news;
mod proxy_image;
mod stock_profile;
mod stocks;
mod translate;
mod x_community;

/// Attach a `Cache-Control` header to a successful payload.
pub(crate) fn with_cache_control(value: &'static str, body: impl IntoResponse) -> Response {
    ([(header::CACHE_CONTROL, value)], body).into_response()
}

/// Fallback for POST-only routes.
pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Query values count as missing when absent or empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(ai_insight::router())
        .merge(chart::router())
        .merge(chatbot::router())
        .merge(content::router())
        .merge(debug::router())
        .merge(news::router())
        .merge(proxy_image::router())
        .merge(stock_profile::router())
        .merge(stocks::router())
        .merge(translate::router())
        .merge(x_community::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors::cors_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
