// ABOUTME: Read-only views of an app: render modes (flowchart, mindmap, board) and lineage timeline.
// ABOUTME: Payloads are fixed demo content keyed by the requested id.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;

/// Which view to render. Unknown modes fall through to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Flowchart,
    Mindmap,
    Board,
}

impl RenderMode {
    /// Parse the `mode` query value; absent or empty means flowchart.
    pub fn parse(mode: Option<&str>) -> Self {
        match mode {
            None | Some("") | Some("flowchart") => RenderMode::Flowchart,
            Some("mindmap") => RenderMode::Mindmap,
            Some(_) => RenderMode::Board,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindmapBranch {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumns {
    #[serde(rename = "Backlog")]
    pub backlog: Vec<String>,
    #[serde(rename = "In progress")]
    pub in_progress: Vec<String>,
    #[serde(rename = "Review")]
    pub review: Vec<String>,
    #[serde(rename = "Done")]
    pub done: Vec<String>,
}

/// Rendered view payload. Serializes flat: `{id, steps}`, `{id, tree}`, or `{id, columns}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderView {
    Flowchart {
        id: String,
        steps: Vec<String>,
    },
    Mindmap {
        id: String,
        tree: Vec<MindmapBranch>,
    },
    Board {
        id: String,
        columns: BoardColumns,
    },
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RenderView {
    pub fn render(id: &str, mode: RenderMode) -> Self {
        let id = id.to_string();
        match mode {
            RenderMode::Flowchart => RenderView::Flowchart {
                id,
                steps: list(&[
                    "Desire",
                    "Normalize",
                    "Spec graph",
                    "Plan graph",
                    "Compile & build",
                    "Running app",
                    "Telemetry",
                ]),
            },
            RenderMode::Mindmap => {
                let branch = |title: &str, items: &[&str]| MindmapBranch {
                    title: title.to_string(),
                    items: list(items),
                };
                RenderView::Mindmap {
                    id,
                    tree: vec![
                        branch("Identity", &["Purpose", "Beneficiaries", "Safety envelope"]),
                        branch("Evidence policy", &["Sources", "Trust tiers", "Cadence"]),
                        branch("Data contracts", &["Entities", "Schemas", "PII flags"]),
                        branch("Workflows", &["Pipelines", "Triggers", "Outputs"]),
                        branch("Interface", &["Panels", "Actions", "Roles"]),
                        branch("Safety", &["Guardrails", "Disclaimers"]),
                        branch("Personalization", &["Preferences", "Heuristics"]),
                        branch("Deployment", &["Devices", "Schedules", "Retention"]),
                    ],
                }
            }
            RenderMode::Board => RenderView::Board {
                id,
                columns: BoardColumns {
                    backlog: list(&["Add contract allocator", "Map policy to cases"]),
                    in_progress: list(&["PHI gate integration"]),
                    review: list(&["Impact queue on home"]),
                    done: list(&["Weather derate on forecast"]),
                },
            },
        }
    }
}

/// One deployed version of an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: String,
    pub label: String,
    pub timestamp: String,
}

/// Version history for an app as of `now`, oldest first.
pub fn lineage_timeline(id: &str, now: DateTime<Utc>) -> Vec<TimelineEntry> {
    [
        ("v1.0.0", "Initial deploy", Duration::minutes(60)),
        ("v1.1.0", "Insert PHI gate", Duration::minutes(30)),
        ("v1.2.0", "Contract tracker panel", Duration::zero()),
    ]
    .into_iter()
    .map(|(version, label, age)| TimelineEntry {
        id: format!("{}@{}", id, version),
        label: label.to_string(),
        timestamp: (now - age).to_rfc3339_opts(SecondsFormat::Millis, true),
    })
    .collect()
}
