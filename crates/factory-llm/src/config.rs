// ABOUTME: Explicit LLM configuration resolved once at process start.
// ABOUTME: Replaces ad-hoc env reads inside adapters so tests can build configs from plain maps.

use std::fmt;

use serde::Serialize;

/// Which vendor adapter to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Map a selection value to an adapter. Case-insensitive; anything
    /// unrecognized (including empty) selects the OpenAI-style default.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "anthropic" => ProviderKind::Anthropic,
            "google" | "gemini" => ProviderKind::Gemini,
            _ => ProviderKind::OpenAI,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Environment key holding this vendor's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Model id an adapter uses when neither the call nor the config names one.
    pub fn fallback_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::Gemini => "gemini-2.0-flash",
        }
    }

    pub fn all() -> [ProviderKind; 3] {
        [
            ProviderKind::OpenAI,
            ProviderKind::Anthropic,
            ProviderKind::Gemini,
        ]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request shape used by the OpenAI-style adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenAIApiStyle {
    /// `messages` array with role-tagged entries.
    #[default]
    ChatCompletions,
    /// Single flattened `input` transcript with `max_output_tokens`.
    Responses,
}

/// Credentials and endpoint override for one vendor.
#[derive(Clone, Default)]
pub struct VendorConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl VendorConfig {
    pub fn new(api_key: Option<&str>, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(String::from),
            base_url: base_url.map(String::from),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// Never print key material.
impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Everything the provider layer reads from the environment.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Raw provider-selection value (`FACTORY_LLM_PROVIDER`).
    pub provider: Option<String>,
    /// Model used when a call site does not name one (`FACTORY_LLM_MODEL`).
    pub default_model: Option<String>,
    pub openai: VendorConfig,
    pub openai_api_style: OpenAIApiStyle,
    pub anthropic: VendorConfig,
    pub gemini: VendorConfig,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// - FACTORY_LLM_PROVIDER: `openai` (default), `anthropic`, `google`/`gemini`
    /// - FACTORY_LLM_MODEL: default model id (optional)
    /// - OPENAI_API_KEY, OPENAI_BASE_URL, OPENAI_API_STYLE (`chat` or `responses`)
    /// - ANTHROPIC_API_KEY, ANTHROPIC_BASE_URL
    /// - GEMINI_API_KEY (or GOOGLE_API_KEY), GEMINI_BASE_URL
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Values are trimmed
    /// and empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key).and_then(|v| {
                let trimmed = v.trim().to_string();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            })
        };

        let openai = VendorConfig {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL"),
        };

        let responses_requested = get("OPENAI_API_STYLE")
            .map(|s| s.eq_ignore_ascii_case("responses"))
            .unwrap_or(false);
        let responses_endpoint = openai
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').ends_with("/responses"))
            .unwrap_or(false);
        let openai_api_style = if responses_requested || responses_endpoint {
            OpenAIApiStyle::Responses
        } else {
            OpenAIApiStyle::ChatCompletions
        };

        Self {
            provider: get("FACTORY_LLM_PROVIDER"),
            default_model: get("FACTORY_LLM_MODEL"),
            openai,
            openai_api_style,
            anthropic: VendorConfig {
                api_key: get("ANTHROPIC_API_KEY"),
                base_url: get("ANTHROPIC_BASE_URL"),
            },
            gemini: VendorConfig {
                api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
                base_url: get("GEMINI_BASE_URL"),
            },
        }
    }

    /// The adapter selected by the provider-selection value.
    pub fn provider_kind(&self) -> ProviderKind {
        ProviderKind::parse(self.provider.as_deref().unwrap_or(""))
    }

    pub fn vendor(&self, kind: ProviderKind) -> &VendorConfig {
        match kind {
            ProviderKind::OpenAI => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
        }
    }
}
