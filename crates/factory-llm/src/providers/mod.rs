// ABOUTME: Provider module aggregating the vendor chat adapters and the provider factory.
// ABOUTME: Shared request plumbing (dispatch, cancellation, payload sniffing) lives here.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::chat::{ChatMessage, ChatOptions, ChatProvider, ChatRole};
use crate::config::{LlmConfig, ProviderKind};
use crate::error::LlmError;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;

/// Build the adapter selected by the configuration's provider value.
///
/// The Gemini-style adapter validates its key here; the others defer the
/// check to their first `chat` call.
pub fn get_provider(config: &LlmConfig) -> Result<Box<dyn ChatProvider>, LlmError> {
    provider_for(config.provider_kind(), config)
}

/// Build the adapter for an explicit provider kind.
pub fn provider_for(
    kind: ProviderKind,
    config: &LlmConfig,
) -> Result<Box<dyn ChatProvider>, LlmError> {
    tracing::debug!(provider = %kind, "constructing chat provider");
    match kind {
        ProviderKind::OpenAI => Ok(Box::new(OpenAIProvider::new(config))),
        ProviderKind::Anthropic => Ok(Box::new(AnthropicProvider::new(config))),
        ProviderKind::Gemini => Ok(Box::new(GeminiProvider::new(config)?)),
    }
}

/// Join every system message with blank lines. `None` when there are none.
pub(crate) fn joined_system(messages: &[ChatMessage]) -> Option<String> {
    let parts: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| m.content.as_str())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Model precedence: call options, configured default, adapter fallback.
pub(crate) fn resolve_model(
    options: &ChatOptions,
    default_model: Option<&str>,
    fallback: &str,
) -> String {
    options
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .or(default_model)
        .unwrap_or(fallback)
        .to_string()
}

/// Send a request, racing it against the cancellation token when one is
/// given. Non-success statuses become `RequestFailed` with the body text.
pub(crate) async fn dispatch(
    vendor: ProviderKind,
    request: reqwest::RequestBuilder,
    signal: Option<&CancellationToken>,
) -> Result<reqwest::Response, LlmError> {
    let sent = match signal {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(LlmError::Cancelled { vendor }),
                result = request.send() => result,
            }
        }
        None => request.send().await,
    };

    let response = sent.map_err(|source| LlmError::Transport { vendor, source })?;

    let status = response.status();
    if !status.is_success() {
        // Body read failures degrade to empty text.
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%vendor, status = status.as_u16(), "vendor returned non-success status");
        return Err(LlmError::RequestFailed {
            vendor,
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// Read a successful response body, still racing the cancellation token.
/// JSON-typed bodies are parsed; anything else (or JSON that fails to parse)
/// is kept as a string payload.
pub(crate) async fn read_payload(
    vendor: ProviderKind,
    response: reqwest::Response,
    signal: Option<&CancellationToken>,
) -> Result<Value, LlmError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let read = match signal {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(LlmError::Cancelled { vendor }),
                result = response.text() => result,
            }
        }
        None => response.text().await,
    };
    let text = read.map_err(|source| LlmError::Transport { vendor, source })?;

    if is_json {
        match serde_json::from_str(&text) {
            Ok(value) => return Ok(value),
            Err(e) => tracing::warn!(%vendor, "JSON-typed body failed to parse: {}", e),
        }
    }
    Ok(Value::String(text))
}

/// String at a JSON pointer, if present.
pub(crate) fn text_at<'a>(payload: &'a Value, pointer: &str) -> Option<&'a str> {
    payload.pointer(pointer).and_then(Value::as_str)
}

pub(crate) fn response_id(payload: &Value) -> String {
    text_at(payload, "/id").unwrap_or_default().to_string()
}
