//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes, HttpBody, to_bytes},
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The number of bytes of a request or response body that are logged at the
/// `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest response body, in bytes, that is buffered so it can be logged.
///
/// Larger responses, and responses without a known length, are passed through
/// and only their headers are logged.
pub const MAX_LOGGED_RESPONSE_SIZE: usize = 2 * 1024 * 1024;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated and
/// the full body is logged at the `debug` level.
///
/// The request body is read with the same limit as axum's body extractors
/// (2 MB unless a [axum::extract::DefaultBodyLimit] layer says otherwise), and
/// larger requests are rejected with 413 Payload Too Large.
///
/// The `password` field of JSON request bodies is never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match Bytes::from_request(Request::from_parts(parts.clone(), body), &()).await
    {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("Rejected request body: {rejection}");
            return Error::PayloadTooLarge.into_response();
        }
        Err(rejection) => {
            tracing::error!("Could not read request body: {rejection}");
            return rejection.into_response();
        }
    };

    log_request(&parts, &request_body_text(&parts.headers, &body_bytes));

    let response = next
        .run(Request::from_parts(parts, Body::from(body_bytes)))
        .await;

    let (parts, body) = response.into_parts();
    let body_length = body.size_hint().exact();

    if body_length.is_none_or(|length| length > MAX_LOGGED_RESPONSE_SIZE as u64) {
        tracing::info!("Sending response: {parts:#?}\nbody: <not logged>");
        tracing::debug!("Response body length: {body_length:?}");
        return Response::from_parts(parts, body);
    }

    let body_bytes = match to_bytes(body, MAX_LOGGED_RESPONSE_SIZE).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Get the text of a request body that is safe to write to the logs.
fn request_body_text(headers: &HeaderMap, body: &Bytes) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        redact_password(body)
    } else if content_type.starts_with("multipart/form-data") {
        format!("<{} bytes of multipart form data>", body.len())
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}

/// Replace the value of a top level `password` field in a JSON object.
///
/// Bodies that are not valid JSON are returned as is.
fn redact_password(body: &[u8]) -> String {
    let Ok(mut json) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).to_string();
    };

    if let Some(password) = json.get_mut("password") {
        *password = Value::String(REDACTED.to_owned());
    }

    json.to_string()
}

/// Shorten `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}
