// ABOUTME: Route definitions for the factory HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/providers", get(api::providers::status))
        .route("/api/spec/normalize", post(api::spec::normalize))
        .route("/api/growth/plan", post(api::growth::plan))
        .route("/api/growth/simulate", post(api::growth::simulate))
        .route("/api/growth/deploy", post(api::growth::deploy))
        .route("/api/templates", get(api::templates::list))
        .route("/api/templates/{id}", get(api::templates::get))
        .route("/api/lineage/{id}", get(api::views::lineage))
        .route("/api/render/{id}", get(api::views::render))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
