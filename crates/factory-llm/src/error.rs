// ABOUTME: Error taxonomy for the provider layer.
// ABOUTME: Configuration, vendor request, transport, and JSON extraction failures.

use thiserror::Error;

use crate::config::ProviderKind;

/// Errors surfaced by adapters, the JSON extractor, and call_json.
/// Nothing here is retried by the provider layer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The adapter's API key is not configured. Raised before any network call.
    #[error("{} missing", .vendor.key_var())]
    KeyMissing { vendor: ProviderKind },

    /// The vendor answered with a non-success status.
    #[error("{vendor} error {status}: {body}")]
    RequestFailed {
        vendor: ProviderKind,
        status: u16,
        body: String,
    },

    /// The HTTP exchange itself failed (connect, TLS, body read).
    #[error("{vendor} request failed: {source}")]
    Transport {
        vendor: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    /// A streamed response carried an error payload.
    #[error("{vendor} stream error: {message}")]
    Stream {
        vendor: ProviderKind,
        message: String,
    },

    #[error("{vendor} request cancelled")]
    Cancelled { vendor: ProviderKind },

    #[error("failed to parse JSON from model output")]
    JsonExtractionFailed,

    /// Extracted JSON did not match the caller's target type.
    #[error("model output does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LlmError {
    /// True for configuration errors (missing credentials).
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::KeyMissing { .. })
    }

    /// The vendor this error came from, if it came from an adapter.
    pub fn vendor(&self) -> Option<ProviderKind> {
        match self {
            LlmError::KeyMissing { vendor }
            | LlmError::RequestFailed { vendor, .. }
            | LlmError::Transport { vendor, .. }
            | LlmError::Stream { vendor, .. }
            | LlmError::Cancelled { vendor } => Some(*vendor),
            LlmError::JsonExtractionFailed | LlmError::Decode(_) => None,
        }
    }
}
