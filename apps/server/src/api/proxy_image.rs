use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use stockhero_core::{http::parse_http_url, Error as CoreError};

use super::non_empty;
use crate::main_lib::AppState;

const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

async fn proxy_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let Some(url) = non_empty(query.url) else {
        return (StatusCode::BAD_REQUEST, "URL parameter required").into_response();
    };

    let target = match parse_http_url(&url) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!("Refusing image proxy for {}: {}", url, e);
            return (StatusCode::BAD_REQUEST, "Invalid image URL").into_response();
        }
    };

    match state
        .http
        .get_image("image", target, state.image_max_bytes)
        .await
    {
        Ok(body) => {
            let content_type = body
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
                ],
                body.bytes,
            )
                .into_response()
        }
        Err(CoreError::UpstreamStatus { status, .. }) => {
            tracing::warn!("Image upstream answered {} for {}", status, url);
            (StatusCode::BAD_GATEWAY, "Failed to fetch image").into_response()
        }
        Err(e @ (CoreError::NotAnImage(_) | CoreError::BodyTooLarge { .. })) => {
            tracing::warn!("Image upstream refused for {}: {}", url, e);
            (StatusCode::BAD_GATEWAY, "Failed to fetch image").into_response()
        }
        Err(e) => {
            tracing::error!("Image proxy error for {}: {}", url, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching image").into_response()
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/proxy-image", get(proxy_image))
}
