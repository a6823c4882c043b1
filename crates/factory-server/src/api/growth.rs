// ABOUTME: Growth handlers: plan morphs for a spec, simulate a plan, and deploy it.
// ABOUTME: Plan and simulate ask the model and fall back to canned payloads; deploy only acknowledges.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use factory_core::{Deployment, GrowthPlan, PlanRecord, Simulation, new_id};
use factory_llm::{CallInput, call_json, plan_prompt, simulate_prompt};
use serde_json::json;

use super::{error_response, lenient_json, required_str};
use crate::app_state::SharedState;

/// POST /api/growth/plan - Propose morphs for a normalized spec.
pub async fn plan(State(state): State<SharedState>, body: Bytes) -> Response {
    let body = lenient_json(&body);
    let Some(spec_graph_id) = required_str(&body, "spec_graph_id") else {
        return error_response(StatusCode::BAD_REQUEST, "missing spec_graph_id");
    };

    let spec = match state.store.get_spec(spec_graph_id).await {
        Some(record) => record.summary,
        None => {
            tracing::debug!(spec_graph_id, "planning for unknown spec");
            json!({ "spec_graph_id": spec_graph_id })
        }
    };

    let planned = call_json::<GrowthPlan>(&state.llm, CallInput::new(plan_prompt(&spec))).await;
    let mut plan = match planned {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(error = %e, spec_graph_id, "plan fell back to static morphs");
            GrowthPlan::fallback("")
        }
    };
    plan.plan_id = new_id("pl");

    state
        .store
        .put_plan(PlanRecord {
            id: plan.plan_id.clone(),
            body: serde_json::to_value(&plan).unwrap_or_default(),
            spec_id: Some(spec_graph_id.to_string()),
        })
        .await;

    Json(plan).into_response()
}

/// POST /api/growth/simulate - Describe the diff a plan would produce.
pub async fn simulate(State(state): State<SharedState>, body: Bytes) -> Response {
    let body = lenient_json(&body);
    let Some(plan_id) = required_str(&body, "plan_id") else {
        return error_response(StatusCode::BAD_REQUEST, "missing plan_id");
    };

    let (plan, spec) = match state.store.get_plan(plan_id).await {
        Some(record) => {
            let spec = match record.spec_id.as_deref() {
                Some(id) => state.store.get_spec(id).await.map(|s| s.summary),
                None => None,
            };
            (record.body, spec)
        }
        None => (json!({ "plan_id": plan_id }), None),
    };

    let simulation = match call_json::<Simulation>(
        &state.llm,
        CallInput::new(simulate_prompt(&plan, spec.as_ref())),
    )
    .await
    {
        Ok(simulation) => simulation,
        Err(e) => {
            tracing::warn!(error = %e, plan_id, "simulate fell back to static diff");
            Simulation::fallback()
        }
    };

    Json(simulation).into_response()
}

/// POST /api/growth/deploy - Accept a plan for deployment.
pub async fn deploy(body: Bytes) -> Response {
    let body = lenient_json(&body);
    let Some(plan_id) = required_str(&body, "plan_id") else {
        return error_response(StatusCode::BAD_REQUEST, "missing plan_id");
    };

    let deployment = Deployment::accepted();
    tracing::info!(plan_id, lineage_id = %deployment.lineage_id, "deploy accepted");
    Json(deployment).into_response()
}
