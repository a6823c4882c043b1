// ABOUTME: Gemini-style adapter implementing ChatProvider over streamGenerateContent (SSE).
// ABOUTME: Drains the chunk stream and concatenates every chunk's text in arrival order.

use async_trait::async_trait;
use futures::{Stream, StreamExt, pin_mut};
use serde_json::{Value, json};

use crate::chat::{ChatMessage, ChatOptions, ChatProvider, ChatResult, ChatRole};
use crate::config::{LlmConfig, ProviderKind};
use crate::error::LlmError;
use crate::providers::{dispatch, joined_system, resolve_model, text_at};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini-style adapter. Unlike the other adapters it refuses to construct
/// without an API key.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.gemini.api_key.clone().ok_or(LlmError::KeyMissing {
            vendor: ProviderKind::Gemini,
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: config
                .gemini
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            default_model: config.default_model.clone(),
        })
    }

    /// Streaming endpoint for one model.
    pub fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }

    /// Build the request body. System messages become one synthetic leading
    /// user turn; assistant turns use the vendor's `model` role.
    pub fn build_request_body(&self, messages: &[ChatMessage], options: &ChatOptions) -> Value {
        let mut contents = Vec::new();

        if let Some(system) = joined_system(messages) {
            contents.push(json!({ "role": "user", "parts": [{ "text": system }] }));
        }

        for m in messages.iter().filter(|m| m.role != ChatRole::System) {
            let role = if m.role == ChatRole::Assistant {
                "model"
            } else {
                "user"
            };
            contents.push(json!({ "role": role, "parts": [{ "text": m.content }] }));
        }

        json!({
            "contents": contents,
            "generationConfig": {
                "temperature": options.temperature_or_default(),
                "maxOutputTokens": options.max_tokens_or_default(),
            }
        })
    }
}

/// Text carried by one streamed chunk: every part of the first candidate,
/// concatenated. Chunks without text contribute nothing.
pub fn chunk_text(chunk: &Value) -> String {
    chunk
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Running state while draining a chunk stream.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    id: String,
    content: String,
    chunks: Vec<Value>,
}

impl StreamAccumulator {
    pub fn push(&mut self, chunk: Value) {
        self.content.push_str(&chunk_text(&chunk));
        if let Some(id) = text_at(&chunk, "/responseId").filter(|id| !id.is_empty()) {
            self.id = id.to_string();
        }
        self.chunks.push(chunk);
    }

    pub fn finish(self) -> ChatResult {
        ChatResult {
            id: self.id,
            content: self.content,
            raw: Value::Array(self.chunks),
        }
    }
}

/// Consume a chunk stream to completion. The first error aborts the drain;
/// partial text is never returned.
pub async fn drain_chunks<S>(chunks: S) -> Result<ChatResult, LlmError>
where
    S: Stream<Item = Result<Value, LlmError>>,
{
    pin_mut!(chunks);
    let mut acc = StreamAccumulator::default();
    while let Some(chunk) = chunks.next().await {
        acc.push(chunk?);
    }
    Ok(acc.finish())
}

/// Splits a byte stream into SSE `data:` payloads, tolerating lines that
/// straddle network chunk boundaries.
#[derive(Debug, Default)]
pub struct SseLines {
    buf: Vec<u8>,
}

impl SseLines {
    /// Feed raw bytes; returns every complete `data:` payload.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(data) = data_payload(&line) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Flush a trailing line that had no newline.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buf);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let data = line.trim().strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        None
    } else {
        Some(data.to_string())
    }
}

/// Decode one SSE payload. Unparseable payloads are skipped; error payloads
/// end the stream.
fn decode_chunk(data: &str) -> Option<Result<Value, LlmError>> {
    let chunk: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("skipping unparseable gemini chunk: {}", e);
            return None;
        }
    };
    if let Some(error) = chunk.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Some(Err(LlmError::Stream {
            vendor: ProviderKind::Gemini,
            message,
        }));
    }
    Some(Ok(chunk))
}

/// Turn a streaming HTTP response into a lazy sequence of decoded chunks.
fn response_chunks(response: reqwest::Response) -> impl Stream<Item = Result<Value, LlmError>> {
    async_stream::try_stream! {
        let mut bytes = response.bytes_stream();
        let mut lines = SseLines::default();

        while let Some(piece) = bytes.next().await {
            let piece = piece.map_err(|source| LlmError::Transport {
                vendor: ProviderKind::Gemini,
                source,
            })?;
            for data in lines.push(&piece) {
                if let Some(chunk) = decode_chunk(&data) {
                    yield chunk?;
                }
            }
        }

        if let Some(chunk) = lines.finish().as_deref().and_then(decode_chunk) {
            yield chunk?;
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResult, LlmError> {
        let vendor = ProviderKind::Gemini;
        let model = resolve_model(
            options,
            self.default_model.as_deref(),
            ProviderKind::Gemini.fallback_model(),
        );
        let url = self.stream_url(&model);
        let body = self.build_request_body(messages, options);

        tracing::debug!(
            %vendor,
            model = %model,
            messages = messages.len(),
            endpoint = %self.base_url,
            "dispatching streaming chat request"
        );

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body);

        // No cancellation path once the stream has started.
        let response = dispatch(vendor, request, None).await?;
        let result = drain_chunks(response_chunks(response)).await?;

        tracing::debug!(%vendor, chars = result.content.len(), "stream drained");
        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
