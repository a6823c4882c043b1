// ABOUTME: Task prompt templates for the normalize, plan, and simulate steps.
// ABOUTME: Each embeds a schema example and the caller's payload in tagged blocks, then a JSON-only rule.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Trailing rule appended to every task prompt.
pub const JSON_ONLY_RULE: &str = "Output JSON only. No backticks, no prose, no explanations.\n\
If unsure, return the best-effort JSON conforming to the schema.";

/// A desire to normalize into a spec summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeInput {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn tagged(tag: &str, value: &impl Serialize) -> [String; 3] {
    [format!("<{}>", tag), pretty(value), format!("</{}>", tag)]
}

fn render(task: &str, schema: &Value, sections: Vec<[String; 3]>) -> String {
    let mut lines = vec![task.to_string()];
    lines.extend(tagged("schema", schema));
    for section in sections {
        lines.extend(section);
    }
    lines.push(JSON_ONLY_RULE.to_string());
    lines.join("\n")
}

/// Prompt asking the model to turn a desire into a spec summary.
pub fn normalize_prompt(input: &NormalizeInput) -> String {
    let schema = json!({
        "spec_graph_id": "string",
        "spec_summary": {
            "identity": {
                "purpose": "string",
                "beneficiaries": ["string"],
                "safety_envelope": ["string"]
            },
            "desire": { "goal": "string", "constraints": ["string"], "outputs": ["string"] },
            "data_contracts": { "entities": [{ "name": "string", "fields": ["string"] }] },
            "workflows": { "pipelines": [{ "name": "string", "steps": ["string"] }] },
            "interface": { "panels": ["string"] }
        }
    });
    let task = "Normalize the following desire into a spec summary.\n\
Follow the schema exactly and respond with JSON only.";

    render(task, &schema, vec![tagged("input", input)])
}

/// Prompt asking the model for a growth plan (morphs plus acceptance tests).
pub fn plan_prompt(spec: &Value) -> String {
    let schema = json!({
        "plan_id": "string",
        "morphs": [
            { "type": "add_source", "name": "string" },
            { "type": "insert_gate", "name": "string", "after": "string" },
            { "type": "allocate", "strategy": "string" },
            { "type": "add_surface", "panels": ["string"] }
        ],
        "tests": ["string"]
    });
    let task = "Propose a growth plan as morphs and acceptance tests.\n\
Use low-risk, incremental steps faithful to the spec.\n\
Respond with JSON only per schema.";

    render(task, &schema, vec![tagged("spec", spec)])
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Prompt asking the model to simulate a plan. The spec section is left out
/// when no spec is given or it is falsy (`null`, `false`, `""`, or zero).
pub fn simulate_prompt(plan: &Value, spec: Option<&Value>) -> String {
    let schema = json!({
        "diff": {
            "summary": "string",
            "changes": ["string"]
        },
        "screenshots": ["string"]
    });
    let task = "Simulate applying the plan to the spec and describe the diff.\n\
Be precise and concrete. Respond with JSON only per schema.";

    let mut sections = vec![tagged("plan", plan)];
    if let Some(spec) = spec.filter(|s| !is_falsy(s)) {
        sections.push(tagged("spec", spec));
    }
    render(task, &schema, sections)
}
