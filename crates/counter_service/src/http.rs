use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use counter_logging::counter_warn;

use crate::{MessageCounter, ProcessError, ServiceSettings};

pub const MESSAGE_PATH: &str = "/message";

#[derive(Clone)]
struct HttpState {
    counter: Arc<MessageCounter>,
    require_json: bool,
}

/// Builds the router serving `POST /message`.
pub fn router(counter: Arc<MessageCounter>, settings: &ServiceSettings) -> Router {
    let state = HttpState {
        counter,
        require_json: settings.require_json_content_type,
    };
    Router::new()
        .route(MESSAGE_PATH, post(post_message))
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .with_state(state)
}

async fn post_message(State(state): State<HttpState>, headers: HeaderMap, body: Bytes) -> Response {
    if state.require_json {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !is_json_content_type(content_type) {
            counter_warn!("Rejected request with content type {:?}", content_type);
            return ProcessError::UnsupportedContentType(content_type.to_string()).into_response();
        }
    }

    match state.counter.process_body(&body) {
        Ok(count) => Json(count).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Accepts `application/json` and `application/<subtype>+json`, ignoring
/// parameters such as `charset`.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", "json")) => true,
        Some(("application", subtype)) => subtype.ends_with("+json"),
        _ => false,
    }
}
