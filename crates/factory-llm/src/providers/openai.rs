// ABOUTME: OpenAI-style adapter implementing ChatProvider.
// ABOUTME: Speaks Chat Completions by default, or the flattened Responses-style body when configured.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::chat::{ChatMessage, ChatOptions, ChatProvider, ChatResult, ChatRole};
use crate::config::{LlmConfig, OpenAIApiStyle, ProviderKind};
use crate::error::LlmError;
use crate::providers::{
    dispatch, joined_system, read_payload, resolve_model, response_id, text_at,
};

const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_RESPONSES_ENDPOINT: &str = "https://api.openai.com/v1/responses";

/// OpenAI-style adapter. Also works against any OpenAI-compatible gateway
/// through `OPENAI_BASE_URL`.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    api_style: OpenAIApiStyle,
    default_model: Option<String>,
}

impl OpenAIProvider {
    /// Resolve endpoint and credentials from configuration. A missing key is
    /// reported on the first `chat` call, not here.
    pub fn new(config: &LlmConfig) -> Self {
        let api_style = config.openai_api_style;
        let endpoint = config.openai.base_url.clone().unwrap_or_else(|| {
            match api_style {
                OpenAIApiStyle::ChatCompletions => DEFAULT_CHAT_ENDPOINT,
                OpenAIApiStyle::Responses => DEFAULT_RESPONSES_ENDPOINT,
            }
            .to_string()
        });

        Self {
            client: reqwest::Client::new(),
            api_key: config.openai.api_key.clone(),
            endpoint,
            api_style,
            default_model: config.default_model.clone(),
        }
    }

    pub fn api_style(&self) -> OpenAIApiStyle {
        self.api_style
    }

    /// Build the JSON request body for the configured API style.
    pub fn build_request_body(&self, messages: &[ChatMessage], options: &ChatOptions) -> Value {
        let model = resolve_model(
            options,
            self.default_model.as_deref(),
            ProviderKind::OpenAI.fallback_model(),
        );

        match self.api_style {
            OpenAIApiStyle::ChatCompletions => json!({
                "model": model,
                "temperature": options.temperature_or_default(),
                "max_tokens": options.max_tokens_or_default(),
                "messages": messages
                    .iter()
                    .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
                    .collect::<Vec<_>>(),
            }),
            OpenAIApiStyle::Responses => json!({
                "model": model,
                "input": flatten_transcript(messages),
                "temperature": options.temperature_or_default(),
                "max_output_tokens": options.max_tokens_or_default(),
            }),
        }
    }

    /// Pull the reply text out of either envelope. Tries `output_text`, then
    /// the first choice's message content, then the first choice's raw text;
    /// the first non-empty one wins.
    pub fn parse_response(payload: &Value) -> String {
        ["/output_text", "/choices/0/message/content", "/choices/0/text"]
            .iter()
            .filter_map(|pointer| text_at(payload, pointer))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Render a message list as one transcript for APIs that take a single
/// input string. System messages lead, joined by blank lines; every other
/// message becomes `ROLE: content`.
pub fn flatten_transcript(messages: &[ChatMessage]) -> String {
    let turns: Vec<String> = messages
        .iter()
        .filter(|m| m.role != ChatRole::System)
        .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
        .collect();

    let mut sections = Vec::new();
    if let Some(system) = joined_system(messages) {
        sections.push(system);
    }
    if !turns.is_empty() {
        sections.push(turns.join("\n\n"));
    }
    sections.join("\n\n")
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResult, LlmError> {
        let vendor = ProviderKind::OpenAI;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::KeyMissing { vendor })?;

        let body = self.build_request_body(messages, options);
        let model = body
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or_default();
        tracing::debug!(
            %vendor,
            model,
            messages = messages.len(),
            endpoint = %self.endpoint,
            "dispatching chat request"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = dispatch(vendor, request, options.signal.as_ref()).await?;
        let raw = read_payload(vendor, response, options.signal.as_ref()).await?;

        Ok(ChatResult {
            id: response_id(&raw),
            content: Self::parse_response(&raw),
            raw,
        })
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
