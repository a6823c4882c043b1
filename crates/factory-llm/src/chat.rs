// ABOUTME: Vendor-neutral chat types and the ChatProvider trait every adapter implements.
// ABOUTME: ChatResult.content is always a flat string regardless of the vendor envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;

/// Sampling temperature used when a call site does not pick one.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Output token cap used when a call site does not pick one.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Who authored a message in the presentation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message. Order in the surrounding slice is
/// presentation order; messages carry no identity beyond their position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Per-call knobs. Unset fields fall back to the adapter's defaults.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Vendor model id. Falls back to the configured default model, then to
    /// the adapter's own hardcoded model.
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Cooperative cancellation, forwarded to the transport call by the
    /// non-streaming adapters.
    pub signal: Option<CancellationToken>,
}

impl ChatOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

/// Normalized reply from any adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResult {
    /// Vendor-assigned response id, empty when the envelope has none.
    pub id: String,
    /// The assistant's reply text, empty when the envelope has none.
    pub content: String,
    /// The untouched vendor payload.
    pub raw: Value,
}

/// Capability implemented by one adapter per vendor API. Each adapter
/// translates the uniform message list into its wire format and the
/// vendor envelope back into a ChatResult.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one chat request. Exactly one outbound call is made unless the
    /// adapter fails its configuration check first.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResult, LlmError>;

    /// Provider name for logging and display (e.g. "openai", "anthropic").
    fn provider_name(&self) -> &str;

    /// Endpoint this adapter talks to, resolved at construction.
    fn endpoint(&self) -> &str;
}
