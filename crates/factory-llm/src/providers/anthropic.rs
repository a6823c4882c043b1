// ABOUTME: Anthropic-style adapter implementing ChatProvider over the Messages API.
// ABOUTME: Lifts system messages into the top-level system field and reads the first content block.

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::chat::{ChatMessage, ChatOptions, ChatProvider, ChatResult, ChatRole};
use crate::config::{LlmConfig, ProviderKind};
use crate::error::LlmError;
use crate::providers::{
    dispatch, joined_system, read_payload, resolve_model, response_id, text_at,
};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic-style adapter.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    default_model: Option<String>,
}

impl AnthropicProvider {
    /// Resolve endpoint and credentials from configuration. A missing key is
    /// reported on the first `chat` call.
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.anthropic.api_key.clone(),
            endpoint: config
                .anthropic
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            default_model: config.default_model.clone(),
        }
    }

    /// Build the JSON request body for the Messages API. The `system` field
    /// is left out entirely when there are no system messages.
    pub fn build_request_body(&self, messages: &[ChatMessage], options: &ChatOptions) -> Value {
        let turns: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = Map::new();
        body.insert(
            "model".to_string(),
            json!(resolve_model(
                options,
                self.default_model.as_deref(),
                ProviderKind::Anthropic.fallback_model(),
            )),
        );
        body.insert("max_tokens".to_string(), json!(options.max_tokens_or_default()));
        body.insert("temperature".to_string(), json!(options.temperature_or_default()));
        if let Some(system) = joined_system(messages) {
            body.insert("system".to_string(), Value::String(system));
        }
        body.insert("messages".to_string(), Value::Array(turns));
        Value::Object(body)
    }

    /// Reply text from the first content block, empty when absent.
    pub fn parse_response(payload: &Value) -> String {
        text_at(payload, "/content/0/text")
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResult, LlmError> {
        let vendor = ProviderKind::Anthropic;
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
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
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
        "anthropic"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
