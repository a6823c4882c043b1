// ABOUTME: Serializable domain payloads exchanged with the model and the HTTP API.
// ABOUTME: Each payload has a static fallback used when the model cannot produce one.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Generate a prefixed identifier, e.g. `sg-01J...`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// What the user wants built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desire {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub purpose: String,
    #[serde(default)]
    pub beneficiaries: Vec<String>,
    #[serde(default)]
    pub safety_envelope: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContracts {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflows {
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default)]
    pub panels: Vec<String>,
}

/// Normalized description of an app: identity, desire, data, workflows, UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSummary {
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub desire: Desire,
    #[serde(default)]
    pub data_contracts: DataContracts,
    #[serde(default)]
    pub workflows: Workflows,
    #[serde(default)]
    pub interface: Interface,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SpecSummary {
    /// Canned contract-allocation spec that echoes the caller's desire.
    pub fn fallback(desire: Desire) -> Self {
        Self {
            identity: Identity {
                purpose: "Factory demo app".to_string(),
                beneficiaries: strings(&["User"]),
                safety_envelope: strings(&["No medical/financial claims"]),
            },
            desire,
            data_contracts: DataContracts {
                entities: vec![
                    Entity {
                        name: "Contract".to_string(),
                        fields: strings(&[
                            "buyer",
                            "sku",
                            "qty_per_week",
                            "price_floor",
                            "delivery_day",
                            "priority",
                        ]),
                    },
                    Entity {
                        name: "Block".to_string(),
                        fields: strings(&["crop", "cultivar", "plant_count"]),
                    },
                    Entity {
                        name: "SprayEvent".to_string(),
                        fields: strings(&["block_id", "product", "date", "phi_days"]),
                    },
                ],
            },
            workflows: Workflows {
                pipelines: vec![Pipeline {
                    name: "Contract allocation".to_string(),
                    steps: strings(&[
                        "Yield forecast",
                        "PHI gate",
                        "Allocate to contracts",
                        "Surplus allocator",
                        "Packlists",
                        "Route plan",
                        "Invoices",
                    ]),
                }],
            },
            interface: Interface {
                panels: strings(&["Triage", "Brief", "Comparator", "Checklist", "Composer"]),
            },
        }
    }
}

/// Result of the normalize step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSpec {
    #[serde(default)]
    pub spec_graph_id: String,
    pub spec_summary: SpecSummary,
}

/// One incremental change proposed by a growth plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Morph {
    AddSource { name: String },
    InsertGate { name: String, after: String },
    Allocate { strategy: String },
    AddSurface { panels: Vec<String> },
}

/// Morphs plus acceptance tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPlan {
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub morphs: Vec<Morph>,
    #[serde(default)]
    pub tests: Vec<String>,
}

impl GrowthPlan {
    pub fn fallback(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            morphs: vec![
                Morph::AddSource {
                    name: "contracts".to_string(),
                },
                Morph::InsertGate {
                    name: "phi_gate".to_string(),
                    after: "yield_forecast".to_string(),
                },
                Morph::Allocate {
                    strategy: "priority".to_string(),
                },
                Morph::AddSurface {
                    panels: strings(&["contract_tracker", "price_spread"]),
                },
            ],
            tests: strings(&[
                "no harvest from phi locked blocks",
                "all tuesday contracts have reservation or shortfall alert",
            ]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationDiff {
    pub summary: String,
    #[serde(default)]
    pub changes: Vec<String>,
}

/// Predicted effect of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub diff: SimulationDiff,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl Simulation {
    pub fn fallback() -> Self {
        Self {
            diff: SimulationDiff {
                summary:
                    "Plan applies 4 morphs with low risk; 2 surfaces updated, 1 new gate inserted."
                        .to_string(),
                changes: strings(&[
                    "Insert PHI gate after Yield forecast",
                    "Allocate to contracts by priority",
                    "Add Contract Tracker panel",
                    "Add Price Spread panel",
                ]),
            },
            screenshots: Vec::new(),
        }
    }
}

/// Acknowledgement of a deploy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub status: String,
    pub lineage_id: String,
}

impl Deployment {
    pub fn accepted() -> Self {
        Self {
            status: "ok".to_string(),
            lineage_id: new_id("ln"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_id_uses_prefix() {
        let id = new_id("sg");
        assert!(id.starts_with("sg-"));
        assert_eq!(id.len(), 3 + 26);
        assert_ne!(new_id("sg"), new_id("sg"));
    }

    #[test]
    fn morphs_are_tagged_by_type() {
        let morph = Morph::InsertGate {
            name: "phi_gate".to_string(),
            after: "yield_forecast".to_string(),
        };
        let value = serde_json::to_value(&morph).unwrap();
        assert_eq!(
            value,
            json!({"type": "insert_gate", "name": "phi_gate", "after": "yield_forecast"})
        );

        let parsed: Morph =
            serde_json::from_value(json!({"type": "add_surface", "panels": ["a"]})).unwrap();
        assert_eq!(
            parsed,
            Morph::AddSurface {
                panels: vec!["a".to_string()]
            }
        );
    }

    #[test]
    fn fallback_spec_echoes_desire() {
        let desire = Desire {
            goal: "Sell more berries".to_string(),
            constraints: vec!["organic".to_string()],
            outputs: vec![],
        };
        let spec = SpecSummary::fallback(desire.clone());
        assert_eq!(spec.desire, desire);
        assert_eq!(spec.data_contracts.entities.len(), 3);
        assert_eq!(spec.workflows.pipelines[0].steps[1], "PHI gate");
    }

    #[test]
    fn fallback_plan_and_simulation_shapes() {
        let plan = GrowthPlan::fallback("pl-x");
        assert_eq!(plan.plan_id, "pl-x");
        assert_eq!(plan.morphs.len(), 4);
        assert_eq!(plan.tests.len(), 2);

        let sim = Simulation::fallback();
        assert_eq!(sim.diff.changes.len(), 4);
        assert!(sim.screenshots.is_empty());
    }

    #[test]
    fn model_output_with_missing_sections_still_parses() {
        let spec: SpecSummary = serde_json::from_value(json!({
            "identity": {"purpose": "p"},
            "interface": {"panels": ["Brief"]}
        }))
        .unwrap();
        assert_eq!(spec.identity.purpose, "p");
        assert!(spec.data_contracts.entities.is_empty());

        let plan: GrowthPlan = serde_json::from_value(json!({"morphs": []})).unwrap();
        assert!(plan.plan_id.is_empty());
    }

    #[test]
    fn deployment_is_accepted_with_lineage() {
        let d = Deployment::accepted();
        assert_eq!(d.status, "ok");
        assert!(d.lineage_id.starts_with("ln-"));
    }
}
