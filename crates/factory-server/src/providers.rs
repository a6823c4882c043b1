// ABOUTME: LLM provider status reporting for the factory API.
// ABOUTME: Summarizes which vendors are configured without ever exposing key values.

use factory_llm::{DEFAULT_CALL_MODEL, LlmConfig, ProviderKind};
use serde::Serialize;

/// Status of a single LLM provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub has_api_key: bool,
    /// Model the API endpoints request through `call_json`.
    pub model: String,
    /// Model a direct adapter call uses when no model is named anywhere.
    pub adapter_fallback_model: String,
    pub base_url: Option<String>,
}

/// Overall provider status.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub selected_provider: String,
    pub default_model: Option<String>,
    pub providers: Vec<ProviderInfo>,
    pub any_available: bool,
}

impl ProviderStatus {
    pub fn from_config(config: &LlmConfig) -> Self {
        let model = config
            .default_model
            .clone()
            .unwrap_or_else(|| DEFAULT_CALL_MODEL.to_string());
        let providers: Vec<ProviderInfo> = ProviderKind::all()
            .into_iter()
            .map(|kind| {
                let vendor = config.vendor(kind);
                ProviderInfo {
                    name: kind.as_str().to_string(),
                    has_api_key: vendor.has_api_key(),
                    model: model.clone(),
                    adapter_fallback_model: kind.fallback_model().to_string(),
                    base_url: vendor.base_url.clone(),
                }
            })
            .collect();
        let any_available = providers.iter().any(|p| p.has_api_key);

        Self {
            selected_provider: config.provider_kind().as_str().to_string(),
            default_model: config.default_model.clone(),
            providers,
            any_available,
        }
    }
}
