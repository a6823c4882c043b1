// ABOUTME: HTTP server for factory, exposing the demo API over Axum.
// ABOUTME: LLM-backed endpoints go through call_json and fall back to static payloads.

pub mod api;
pub mod app_state;
pub mod config;
pub mod providers;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, FactoryConfig};
pub use routes::create_router;
