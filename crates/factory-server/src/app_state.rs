// ABOUTME: Shared application state for the factory HTTP server.
// ABOUTME: Holds the in-memory spec/plan store and the resolved LLM configuration.

use std::sync::Arc;

use factory_core::Store;
use factory_llm::LlmConfig;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub store: Store,
    pub llm: LlmConfig,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(llm: LlmConfig) -> Self {
        Self {
            store: Store::new(),
            llm,
        }
    }
}
