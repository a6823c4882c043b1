// ABOUTME: System prompt selection by model id, vendor attribution header, and environment block.
// ABOUTME: Personas are fixed instruction strings; selection is case-insensitive substring matching.

use chrono::{Local, NaiveDate};

use crate::config::ProviderKind;

const ANTHROPIC_HEADER: &str = "You are Claude Code, Anthropic's official CLI for Claude.";

/// Fixed instructional style chosen from the model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// Terminal coding agent voice, for gpt-5 family models.
    CodingAgent,
    /// Keep-going, plan/execute/validate voice, for other OpenAI models.
    Persistent,
    /// Convention-first voice, for Gemini models.
    ConventionFirst,
    /// Minimal one-liner voice, for Claude models.
    Concise,
    /// Default terse CLI voice.
    Terse,
}

impl Persona {
    /// Pick a persona for a model id. First match wins, in this order:
    /// contains "gpt-5"; starts with "gpt-", "o1" or "o3"; contains
    /// "gemini"; contains "claude"; anything else.
    pub fn for_model(model: &str) -> Self {
        let id = model.to_lowercase();
        if id.contains("gpt-5") {
            Persona::CodingAgent
        } else if id.starts_with("gpt-") || id.starts_with("o1") || id.starts_with("o3") {
            Persona::Persistent
        } else if id.contains("gemini") {
            Persona::ConventionFirst
        } else if id.contains("claude") {
            Persona::Concise
        } else {
            Persona::Terse
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Persona::CodingAgent => concat!(
                "You are a coding agent for Factory, a terminal-first coding assistant.\n",
                "Communicate concisely and act precisely. Prefer actionable guidance.\n",
                "Before tool actions, give a one-line preamble of what's next.\n",
                "Use plans when multi-step work benefits from checkpoints.\n",
                "Respect existing conventions; avoid unnecessary churn and comments."
            ),
            Persona::Persistent => concat!(
                "Keep going until the task is fully solved.\n",
                "Be concise but thorough. Avoid repetition.\n",
                "Plan, execute, validate. Test when possible."
            ),
            Persona::ConventionFirst => concat!(
                "Strictly follow existing code conventions and architecture.\n",
                "Be proactive within scope; confirm large deviations.\n",
                "Keep outputs short and focused."
            ),
            Persona::Concise => concat!(
                "You are a concise CLI assistant for engineering tasks.\n",
                "Prefer one-liners. Only include what's necessary.\n",
                "Do not add summaries unless asked."
            ),
            Persona::Terse => concat!(
                "You are an interactive CLI tool for software engineering.\n",
                "Answer tersely. Avoid introductions and conclusions.\n",
                "Follow project conventions. Do not assume libraries exist."
            ),
        }
    }
}

/// System prompt for a model id.
pub fn system_by_model(model: &str) -> &'static str {
    Persona::for_model(model).prompt()
}

/// Vendor attribution line. Only the Anthropic-style provider gets one;
/// every other provider name yields an empty string.
pub fn system_header(provider: &str) -> &'static str {
    if ProviderKind::parse(provider) == ProviderKind::Anthropic {
        ANTHROPIC_HEADER
    } else {
        ""
    }
}

/// Inputs to the environment block beyond platform and date.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentContext {
    pub cwd: Option<String>,
}

impl EnvironmentContext {
    pub fn with_cwd(cwd: impl Into<String>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

/// Render the `<env>` block for the current platform and today's date.
pub fn environment_block(ctx: &EnvironmentContext) -> String {
    render_environment(ctx, std::env::consts::OS, Local::now().date_naive())
}

fn render_environment(ctx: &EnvironmentContext, platform: &str, date: NaiveDate) -> String {
    let mut lines = vec![
        "Here is useful information about your environment:".to_string(),
        "<env>".to_string(),
        format!("  Platform: {}", platform),
        format!("  Today's date: {}", date.format("%a %b %d %Y")),
    ];
    if let Some(cwd) = ctx.cwd.as_deref().filter(|c| !c.is_empty()) {
        lines.push(format!("  Working directory: {}", cwd));
    }
    lines.push("</env>".to_string());
    lines.join("\n")
}
