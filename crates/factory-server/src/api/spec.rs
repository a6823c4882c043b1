// ABOUTME: Spec normalization handler: turns a desire into a spec summary.
// ABOUTME: Asks the model first and falls back to the canned summary on any failure.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use factory_core::{Desire, NormalizedSpec, SpecRecord, SpecSummary, new_id};
use factory_llm::{CallInput, NormalizeInput, call_json, normalize_prompt};

use crate::app_state::SharedState;

/// POST /api/spec/normalize - Normalize a desire into a stored spec summary.
pub async fn normalize(State(state): State<SharedState>, body: Bytes) -> Json<NormalizedSpec> {
    let input: NormalizeInput = serde_json::from_slice(&body).unwrap_or_default();

    let mut spec = match call_json::<NormalizedSpec>(
        &state.llm,
        CallInput::new(normalize_prompt(&input)),
    )
    .await
    {
        Ok(spec) => spec,
        Err(e) => {
            tracing::warn!(error = %e, "normalize fell back to static spec summary");
            let desire = Desire {
                goal: input.goal,
                constraints: input.constraints,
                outputs: input.outputs,
            };
            NormalizedSpec {
                spec_graph_id: String::new(),
                spec_summary: SpecSummary::fallback(desire),
            }
        }
    };
    // Model-chosen ids are not trusted to be unique.
    spec.spec_graph_id = new_id("sg");

    state
        .store
        .put_spec(SpecRecord {
            id: spec.spec_graph_id.clone(),
            summary: serde_json::to_value(&spec.spec_summary).unwrap_or_default(),
        })
        .await;

    Json(spec)
}
