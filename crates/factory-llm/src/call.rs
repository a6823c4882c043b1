// ABOUTME: call_json orchestrator: assembles the message sequence, calls the provider, extracts JSON.
// ABOUTME: Callers own the fallback; every failure here propagates unchanged.

use serde::de::DeserializeOwned;

use crate::chat::{ChatMessage, ChatOptions};
use crate::config::{LlmConfig, ProviderKind};
use crate::error::LlmError;
use crate::extract::extract_json;
use crate::prompts::system::{
    EnvironmentContext, environment_block, system_by_model, system_header,
};
use crate::providers::provider_for;

/// Model used when neither the call nor the configuration names one.
pub const DEFAULT_CALL_MODEL: &str = "gpt-5";

/// One structured-output request.
#[derive(Debug, Clone, Default)]
pub struct CallInput {
    /// Rendered task prompt, sent as the single user turn.
    pub task: String,
    pub model: Option<String>,
    /// Provider selection override; the configured provider otherwise.
    pub provider: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl CallInput {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }
}

/// Build the message sequence: attribution header (Anthropic only), model
/// persona, environment block, then the task.
pub fn build_messages(
    provider: ProviderKind,
    model: &str,
    task: &str,
    env: &EnvironmentContext,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(4);
    let header = system_header(provider.as_str());
    if !header.is_empty() {
        messages.push(ChatMessage::system(header));
    }
    messages.push(ChatMessage::system(system_by_model(model)));
    messages.push(ChatMessage::system(environment_block(env)));
    messages.push(ChatMessage::user(task));
    messages
}

/// Ask the selected provider for JSON and decode it into `T`.
pub async fn call_json<T: DeserializeOwned>(
    config: &LlmConfig,
    input: CallInput,
) -> Result<T, LlmError> {
    let kind = input
        .provider
        .as_deref()
        .map(ProviderKind::parse)
        .unwrap_or_else(|| config.provider_kind());
    let provider = provider_for(kind, config)?;

    let model = input
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_CALL_MODEL.to_string());

    let env = EnvironmentContext {
        cwd: std::env::current_dir()
            .ok()
            .map(|p| p.display().to_string()),
    };
    let messages = build_messages(kind, &model, &input.task, &env);

    let mut options = ChatOptions::default().with_model(model);
    options.temperature = input.temperature;
    options.max_tokens = input.max_tokens;

    let result = provider.chat(&messages, &options).await?;
    tracing::debug!(
        provider = provider.provider_name(),
        id = %result.id,
        chars = result.content.len(),
        "received model output"
    );

    let value = extract_json(&result.content)?;
    Ok(serde_json::from_value(value)?)
}
