//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `diagramchat-core`, plus a factory ([`create_provider`])
//! that builds it from the loaded configuration.
//!
//! [`LlmProvider`]: diagramchat_core::llm::provider::LlmProvider

pub mod openai_compat;

use diagramchat_core::llm::box_provider::BoxLlmProvider;
use diagramchat_types::config::GlobalConfig;
use secrecy::{ExposeSecret, SecretString};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Build the completion provider named by `config`.
///
/// The base URL comes from `config.api_base_url`, so any endpoint that speaks
/// the chat completions protocol (OpenAI, a local gateway) can be used.
pub fn create_provider(config: &GlobalConfig, api_key: &SecretString) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: provider_name_for(&config.api_base_url).to_string(),
        base_url: config.api_base_url.clone(),
        api_key: api_key.expose_secret().to_string(),
        model: config.model.clone(),
    });
    BoxLlmProvider::new(provider)
}

fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.starts_with(openai_compat::config::OPENAI_BASE_URL) {
        "openai"
    } else {
        "openai-compatible"
    }
}
