// ABOUTME: LLM provider layer for factory: one chat interface over several vendor APIs.
// ABOUTME: Also hosts prompt rendering, JSON recovery from model output, and the call_json orchestrator.

pub mod call;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod providers;

pub use call::{CallInput, DEFAULT_CALL_MODEL, call_json};
pub use chat::{
    ChatMessage, ChatOptions, ChatProvider, ChatResult, ChatRole, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use config::{LlmConfig, OpenAIApiStyle, ProviderKind, VendorConfig};
pub use error::LlmError;
pub use extract::extract_json;
pub use prompts::system::{
    EnvironmentContext, Persona, environment_block, system_by_model, system_header,
};
pub use prompts::tasks::{NormalizeInput, normalize_prompt, plan_prompt, simulate_prompt};
pub use providers::{get_provider, provider_for};
