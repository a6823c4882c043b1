// ABOUTME: Provider status handler.

use axum::Json;
use axum::extract::State;

use crate::app_state::SharedState;
use crate::providers::ProviderStatus;

/// GET /api/providers - Which vendors are configured, without key values.
pub async fn status(State(state): State<SharedState>) -> Json<ProviderStatus> {
    Json(ProviderStatus::from_config(&state.llm))
}
