// ABOUTME: Configuration loading for the factory server.
// ABOUTME: Resolves the bind address and the LLM configuration from one key lookup.

use std::net::SocketAddr;

use factory_llm::LlmConfig;
use thiserror::Error;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FACTORY_BIND is not a valid socket address: {0}")]
    InvalidBind(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    pub bind: SocketAddr,
    pub llm: LlmConfig,
}

impl FactoryConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - FACTORY_BIND: socket address to bind (default: 127.0.0.1:3000)
    /// - FACTORY_LLM_PROVIDER / FACTORY_LLM_MODEL and the vendor keys, see `LlmConfig`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_str = lookup("FACTORY_BIND")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        Ok(Self {
            bind,
            llm: LlmConfig::from_lookup(lookup),
        })
    }
}
