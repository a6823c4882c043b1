// ABOUTME: API module containing all HTTP handler functions for the factory REST API.
// ABOUTME: Sub-modules cover spec normalization, growth steps, templates, views, and provider status.

pub mod growth;
pub mod providers;
pub mod spec;
pub mod templates;
pub mod views;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// Parse a request body as JSON, treating anything unparseable as `{}`.
pub(crate) fn lenient_json(body: &[u8]) -> Value {
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Default::default()))
}

/// Non-empty string field of a JSON body.
pub(crate) fn required_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
