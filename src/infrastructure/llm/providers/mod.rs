//! # LLM Providers
//!
//! Wire implementations for the two providers: Gemini (text, JSON schema,
//! search grounding) and the OpenAI-compatible API (chat, model listing,
//! containers).

mod gemini;
mod openai;

use crate::domain::config::ProviderSettings;
use crate::domain::error::ProviderError;
use crate::infrastructure::llm::{Context, Provider, Response};

pub use openai::{create_container, list_models};

/// Configuration for a provider
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for non-default endpoints)
    pub base_url: Option<String>,
    /// Default model
    pub default_model: String,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

impl ProviderConfig {
    pub fn from_settings(provider: Provider, config: &ProviderSettings) -> Result<Self, ProviderError> {
        let name = provider.as_str();
        let api_key = if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_empty()) {
            key.clone()
        } else if let Some(env_var) = &config.api_key_env {
            std::env::var(env_var).map_err(|e| {
                ProviderError::new(name, format!("API key env var {} not set: {}", env_var, e))
            })?
        } else {
            return Err(ProviderError::new(
                name,
                "No API key provided - set api_key or api_key_env",
            ));
        };

        Ok(Self::with_key(api_key, config))
    }

    /// Uses an explicit key, keeping endpoint/model/timeout from the settings.
    pub fn with_key(api_key: impl Into<String>, config: &ProviderSettings) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: config.endpoint.clone(),
            default_model: config.model.clone(),
            timeout: config.timeout,
        }
    }

    fn request_timeout(&self) -> Option<std::time::Duration> {
        self.timeout.map(std::time::Duration::from_secs)
    }
}

/// Execute a chat request with the specified provider
pub async fn chat(
    provider: Provider,
    config: ProviderConfig,
    context: Context,
) -> Result<Response, ProviderError> {
    match provider {
        Provider::Gemini => gemini::chat(config, context).await,
        Provider::OpenAI => openai::chat(config, context).await,
    }
}

/// Pulls the most useful message out of an error body.
fn error_message(provider: &str, status: reqwest::StatusCode, body: &str) -> ProviderError {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(error_msg) = error_json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return ProviderError::new(provider, error_msg);
        }
    }
    ProviderError::new(provider, format!("HTTP {}: {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins_over_env() {
        let settings = ProviderSettings {
            api_key: Some("explicit".into()),
            api_key_env: Some("CASSA_TEST_UNSET_VAR".into()),
            model: "m".into(),
            endpoint: Some("http://localhost".into()),
            timeout: Some(5),
        };
        let config = ProviderConfig::from_settings(Provider::Gemini, &settings).unwrap();
        assert_eq!(config.api_key, "explicit");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost"));
        assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_key_is_provider_error() {
        let settings = ProviderSettings {
            api_key_env: Some("CASSA_TEST_DEFINITELY_UNSET_VAR".into()),
            ..Default::default()
        };
        let err = ProviderConfig::from_settings(Provider::OpenAI, &settings).err().unwrap();
        assert_eq!(err.provider, "openai");
        assert!(err.message.contains("CASSA_TEST_DEFINITELY_UNSET_VAR"));

        let err = ProviderConfig::from_settings(Provider::Gemini, &ProviderSettings::default())
            .err()
            .unwrap();
        assert!(err.message.contains("No API key provided"));
    }

    #[test]
    fn test_error_message_prefers_json_body() {
        let err = error_message(
            "gemini",
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"API key not valid"}}"#,
        );
        assert_eq!(err.to_string(), "[gemini] API key not valid");
        let err = error_message("openai", reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.message.starts_with("HTTP 502"));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("Gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("openai"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("claude"), None);
    }
}
