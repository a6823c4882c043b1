// ABOUTME: Template catalog handlers.
// ABOUTME: Lists the built-in app templates and fetches one by id.

use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use factory_core::{get_template, list_templates};

use super::error_response;

/// GET /api/templates
pub async fn list() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "templates": list_templates() }))
}

/// GET /api/templates/{id}
pub async fn get(Path(id): Path<String>) -> Response {
    match get_template(&id) {
        Some(template) => Json(template).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "not found"),
    }
}
