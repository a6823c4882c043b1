// ABOUTME: Built-in app template catalog shown on the landing page.
// ABOUTME: Each template pairs a starter desire with a ready-made spec summary.

use std::sync::OnceLock;

use serde::Serialize;

use crate::model::{
    DataContracts, Desire, Entity, Identity, Interface, Pipeline, SpecSummary, Workflows,
};

/// A starter app: a desire plus the spec it normalizes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppTemplate {
    pub id: String,
    pub label: String,
    pub desire: Desire,
    pub spec: SpecSummary,
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn entity(name: &str, fields: &[&str]) -> Entity {
    Entity {
        name: name.to_string(),
        fields: list(fields),
    }
}

struct Blueprint<'a> {
    id: &'a str,
    label: &'a str,
    goal: &'a str,
    constraints: &'a [&'a str],
    outputs: &'a [&'a str],
    purpose: &'a str,
    beneficiaries: &'a [&'a str],
    safety: &'a [&'a str],
    entities: Vec<Entity>,
    pipeline: &'a str,
    steps: &'a [&'a str],
    panels: &'a [&'a str],
}

impl Blueprint<'_> {
    fn build(self) -> AppTemplate {
        let desire = Desire {
            goal: self.goal.to_string(),
            constraints: list(self.constraints),
            outputs: list(self.outputs),
        };
        AppTemplate {
            id: self.id.to_string(),
            label: self.label.to_string(),
            spec: SpecSummary {
                identity: Identity {
                    purpose: self.purpose.to_string(),
                    beneficiaries: list(self.beneficiaries),
                    safety_envelope: list(self.safety),
                },
                desire: desire.clone(),
                data_contracts: DataContracts {
                    entities: self.entities,
                },
                workflows: Workflows {
                    pipelines: vec![Pipeline {
                        name: self.pipeline.to_string(),
                        steps: list(self.steps),
                    }],
                },
                interface: Interface {
                    panels: list(self.panels),
                },
            },
            desire,
        }
    }
}

fn catalog() -> Vec<AppTemplate> {
    vec![
        Blueprint {
            id: "law",
            label: "Law Practitioners (US/UK)",
            goal: "Track statutes, regulations, and case law in a specialty",
            constraints: &["US and UK jurisdictions"],
            outputs: &["matter brief", "precedent digest", "filing checklist", "risk memo"],
            purpose: "Monitor legal updates and produce client-ready analyses",
            beneficiaries: &["Attorney", "Paralegal", "Client"],
            safety: &["Not legal advice", "Verify citations"],
            entities: vec![
                entity(
                    "Statute",
                    &["citation", "jurisdiction", "summary", "effective_date"],
                ),
                entity("Regulation", &["citation", "agency", "summary", "updated"]),
                entity("CaseLaw", &["title", "citation", "holding", "jurisdiction"]),
            ],
            pipeline: "Legal update tracker",
            steps: &[
                "Fetch updates",
                "Classify by topic",
                "Summarize implications",
                "Generate checklist",
            ],
            panels: &["Matter Brief", "Precedent Digest", "Checklist Composer", "Risk Memo"],
        }
        .build(),
        Blueprint {
            id: "farm",
            label: "Small Farms & Growers",
            goal:
                "Turn weather, pest alerts, cultivar research, and market signals into crop plans",
            constraints: &["organic practices"],
            outputs: &[
                "planting calendar",
                "pruning schedule",
                "pest treatment plan",
                "market-day pricing",
            ],
            purpose: "Assist growers with planning and market decisions",
            beneficiaries: &["Farmer", "Field Manager"],
            safety: &["No pesticide recommendations without label"],
            entities: vec![
                entity("Weather", &["date", "temp_high", "temp_low", "precip"]),
                entity("Alert", &["type", "severity", "crop"]),
                entity("MarketPrice", &["crop", "price", "market_day"]),
            ],
            pipeline: "Crop plan generator",
            steps: &["Ingest signals", "Assess risk", "Update calendars", "Recommend actions"],
            panels: &["Planting Calendar", "Pest Treatments", "Input Notes", "Pricing Cheatsheet"],
        }
        .build(),
        Blueprint {
            id: "culinary",
            label: "Culinary Professionals / Dietitians",
            goal:
                "Track allergen alerts and nutrition research; tailor menus to client constraints",
            constraints: &["dietary restrictions"],
            outputs: &["menu plan", "substitution matrix", "nutrition summary"],
            purpose: "Plan menus that respect allergens and nutritional goals",
            beneficiaries: &["Chef", "Dietitian", "Client"],
            safety: &["Verify allergen information"],
            entities: vec![
                entity("Ingredient", &["name", "allergens", "nutrition"]),
                entity("Alert", &["ingredient", "issue", "date"]),
                entity("MenuItem", &["title", "ingredients", "calories"]),
            ],
            pipeline: "Menu planner",
            steps: &[
                "Gather alerts",
                "Match client profile",
                "Suggest substitutions",
                "Summarize nutrition",
            ],
            panels: &["Menu Plan", "Substitution Matrix", "Nutrition Summary"],
        }
        .build(),
        Blueprint {
            id: "immigration",
            label: "Immigration / Compliance Advisors",
            goal: "Monitor policy changes and case law; generate client checklists and timelines",
            constraints: &["current regulations"],
            outputs: &["eligibility matrix", "document checklist", "milestone plan"],
            purpose: "Assist advisors with immigration and compliance planning",
            beneficiaries: &["Advisor", "Client"],
            safety: &["Not legal advice", "Verify filing deadlines"],
            entities: vec![
                entity(
                    "PolicyUpdate",
                    &["jurisdiction", "summary", "effective_date"],
                ),
                entity("CaseDecision", &["citation", "holding", "jurisdiction"]),
                entity("Client", &["name", "status", "country"]),
            ],
            pipeline: "Compliance tracker",
            steps: &[
                "Collect updates",
                "Assess eligibility",
                "Generate checklist",
                "Plan milestones",
            ],
            panels: &["Eligibility Matrix", "Document Checklist", "Milestone Plan"],
        }
        .build(),
    ]
}

/// All templates, in display order.
pub fn list_templates() -> &'static [AppTemplate] {
    static TEMPLATES: OnceLock<Vec<AppTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(catalog)
}

pub fn get_template(id: &str) -> Option<&'static AppTemplate> {
    list_templates().iter().find(|t| t.id == id)
}
