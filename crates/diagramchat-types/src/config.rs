//! Global configuration types for diagramchat.
//!
//! `GlobalConfig` represents the optional `config.toml` in the data
//! directory. Secrets never live here; they come from the environment.

use serde::{Deserialize, Serialize};

/// Tunables for the generation call and history windows.
///
/// Loaded from `~/.diagramchat/config.toml`. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Model identifier sent to the chat-completion API.
    #[serde(default = "default_model")]
    pub model: String,

    /// Cap on generated tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// How many of the most recent messages are sent as context.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Maximum number of messages read back from a session.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_context_window() -> usize {
    10
}

fn default_history_limit() -> i64 {
    100
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            context_window: default_context_window(),
            history_limit: default_history_limit(),
            api_base_url: default_api_base_url(),
        }
    }
}
