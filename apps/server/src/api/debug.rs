use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde_json::{json, Map, Value};
use stockhero_core::utils::time_utils::to_iso_string;

use crate::{error::ApiResult, main_lib::AppState};

fn request_url(uri: &Uri, headers: &HeaderMap) -> String {
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, uri),
        None => uri.to_string(),
    }
}

/// Echo of the request and whether the chat key is configured.
async fn debug_info(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let echoed: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    let body = json!({
        "platform": state.platform,
        "timestamp": to_iso_string(&state.clock.now()),
        "url": request_url(&uri, &headers),
        "method": method.as_str(),
        "headers": echoed,
        "env_vars": {
            "GROQ_API_KEY": if state.groq_configured { "SET" } else { "NOT SET" },
        },
    });
    let pretty = serde_json::to_string_pretty(&body).map_err(anyhow::Error::from)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], pretty).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/debug", any(debug_info))
}
