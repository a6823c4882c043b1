// ABOUTME: Read-only view handlers for lineage timelines and rendered app views.

use axum::Json;
use axum::extract::{Path, Query};
use chrono::Utc;
use factory_core::{RenderMode, RenderView, lineage_timeline};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    pub mode: Option<String>,
}

/// GET /api/lineage/{id}
pub async fn lineage(Path(id): Path<String>) -> Json<serde_json::Value> {
    let timeline = lineage_timeline(&id, Utc::now());
    Json(serde_json::json!({ "id": id, "timeline": timeline }))
}

/// GET /api/render/{id}?mode=flowchart|mindmap|board
pub async fn render(Path(id): Path<String>, Query(query): Query<RenderQuery>) -> Json<RenderView> {
    Json(RenderView::render(&id, RenderMode::parse(query.mode.as_deref())))
}
