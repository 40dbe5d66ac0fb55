//! Application configuration types for Confab.
//!
//! `AppConfig` represents the `config.toml` under the data directory.
//! Every field has a default so a missing or partial file always loads.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Confab backend.
///
/// Loaded from `{data_dir}/config.toml`. Secrets (API key, token signing
/// key) are never stored here; they come from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub uploads: UploadConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the REST API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for chat turns.
    #[serde(default = "default_model")]
    pub model: String,

    /// Cheaper model used for title derivation.
    #[serde(default = "default_title_model")]
    pub title_model: String,

    /// Token cap for vision responses.
    #[serde(default = "default_vision_max_tokens")]
    pub vision_max_tokens: u32,

    /// Timeout for provider HTTP requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_title_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_vision_max_tokens() -> u32 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            title_model: default_title_model(),
            vision_max_tokens: default_vision_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Token issuance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of issued bearer tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl_secs(),
        }
    }
}

/// Image upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum decoded image size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.title_model, "gpt-3.5-turbo");
        assert_eq!(config.llm.vision_max_tokens, 1000);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.uploads.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.request_timeout_secs, 120);
    }

    #[test]
    fn test_app_config_deserialize_partial() {
        let toml_str = r#"
[llm]
model = "gpt-4o"

[server]
bind = "0.0.0.0:9000"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        // Unspecified fields keep their defaults.
        assert_eq!(config.llm.title_model, "gpt-3.5-turbo");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.uploads.max_bytes, 10 * 1024 * 1024);
    }
}
