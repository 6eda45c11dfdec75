//! Configuration and secret loading for diagramchat.
//!
//! Reads `config.toml` from the data directory (`~/.diagramchat/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed. Secrets come from the environment only.

use std::path::{Path, PathBuf};

use diagramchat_types::config::GlobalConfig;
use secrecy::SecretString;

/// Secret used to sign session cookies when `SESSION_SECRET` is unset.
pub const FALLBACK_SESSION_SECRET: &str = "fallback-secret-key-for-development";

/// API key sent when `OPENAI_API_KEY` is unset.
pub const FALLBACK_API_KEY: &str = "default_key";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Checks `DIAGRAMCHAT_DATA_DIR`, then `~/.diagramchat`, then `./.diagramchat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DIAGRAMCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".diagramchat");
    }

    PathBuf::from(".diagramchat")
}

/// Process secrets: the cookie signing key and the completion API key.
pub struct Secrets {
    pub session_secret: SecretString,
    pub api_key: SecretString,
}

impl Secrets {
    /// Read secrets from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read secrets through `lookup`, substituting the development fallbacks
    /// for unset or empty values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let session_secret = lookup_or_fallback(&lookup, "SESSION_SECRET", FALLBACK_SESSION_SECRET);
        let api_key = lookup_or_fallback(&lookup, "OPENAI_API_KEY", FALLBACK_API_KEY);

        Self {
            session_secret: SecretString::from(session_secret),
            api_key: SecretString::from(api_key),
        }
    }
}

fn lookup_or_fallback(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    fallback: &str,
) -> String {
    match lookup(name) {
        Some(value) if !value.is_empty() => value,
        _ => {
            tracing::warn!("{name} is not set, using insecure development fallback");
            fallback.to_string()
        }
    }
}
