//! # LLM Clients
//!
//! `GeminiGateway` backs the primary [`LlmGateway`]; `OpenAiService` backs the
//! runtime-keyed [`ContainerProvider`]. Both route requests through
//! `providers::chat` and surface failures as `ProviderError`.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::domain::config::ProviderSettings;
use crate::domain::error::ProviderError;
use crate::domain::traits::{ContainerProvider, LlmGateway};
use crate::domain::types::{ApiKeyStatus, Research};
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Context, Provider, Response};

pub const OPENAI_NOT_READY: &str =
    "OpenAI Service is not initialized or the API key is invalid. Set a valid key with /key <api-key>.";

/// Primary provider client. The key is resolved per request so a missing key
/// shows up as a provider error instead of a startup failure.
pub struct GeminiGateway {
    settings: ProviderSettings,
}

impl GeminiGateway {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    async fn send(&self, context: Context) -> Result<Response, ProviderError> {
        let config = ProviderConfig::from_settings(Provider::Gemini, &self.settings)?;
        let response = providers::chat(Provider::Gemini, config, context).await?;
        tracing::debug!(
            "gemini model={} tokens={} (prompt {}, completion {})",
            response.model,
            response.usage.total_tokens,
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );
        Ok(response)
    }
}

/// Strips a surrounding ```json fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn complete(&self, prompt: &str, system: &str, temperature: f32) -> Result<String, ProviderError> {
        let context = Context::prompt(prompt)
            .with_system(system)
            .with_temperature(temperature);
        Ok(self.send(context).await?.content)
    }

    async fn complete_json(
        &self,
        prompt: &str,
        system: &str,
        schema: Value,
        temperature: f32,
    ) -> Result<Value, ProviderError> {
        let context = Context::prompt(prompt)
            .with_system(system)
            .with_temperature(temperature)
            .with_schema(schema);
        let response = self.send(context).await?;
        serde_json::from_str(strip_code_fence(&response.content))
            .map_err(|e| ProviderError::new("gemini", format!("Response is not valid JSON: {}", e)))
    }

    async fn research(&self, topic: &str, system: &str) -> Result<Research, ProviderError> {
        let prompt = crate::strings::prompts::research(topic);
        let context = Context::prompt(prompt)
            .with_system(system)
            .with_temperature(0.3)
            .with_grounding();
        let response = self.send(context).await.map_err(|e| {
            ProviderError::new("gemini", format!("Failed to research topic. Details: {}", e.message))
        })?;
        if response.content.trim().is_empty() {
            return Err(ProviderError::new(
                "gemini",
                "Failed to research topic. Details: The research query returned no summary.",
            ));
        }
        Ok(Research {
            summary: response.content,
            sources: response.sources,
        })
    }
}

/// Secondary provider. Unusable until `initialize` validates a key.
pub struct OpenAiService {
    settings: ProviderSettings,
    inner: Mutex<OpenAiState>,
}

struct OpenAiState {
    config: Option<ProviderConfig>,
    status: ApiKeyStatus,
}

impl OpenAiService {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(OpenAiState {
                config: None,
                status: ApiKeyStatus::NotSet,
            }),
        }
    }

    fn set(&self, config: Option<ProviderConfig>, status: ApiKeyStatus) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.config = config;
            guard.status = status;
        }
    }

    fn ready_config(&self) -> Result<ProviderConfig, ProviderError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| ProviderError::new("openai", OPENAI_NOT_READY))?;
        match (&guard.config, guard.status) {
            (Some(config), ApiKeyStatus::Valid) => Ok(config.clone()),
            _ => Err(ProviderError::new("openai", OPENAI_NOT_READY)),
        }
    }
}

#[async_trait]
impl ContainerProvider for OpenAiService {
    async fn initialize(&self, api_key: &str) -> bool {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            self.set(None, ApiKeyStatus::NotSet);
            return false;
        }

        self.set(None, ApiKeyStatus::Validating);
        let config = ProviderConfig::with_key(api_key, &self.settings);
        match providers::list_models(&config).await {
            Ok(models) => {
                tracing::info!("OpenAI API key is valid ({} models visible)", models.len());
                self.set(Some(config), ApiKeyStatus::Valid);
                true
            }
            Err(e) => {
                tracing::error!("OpenAI API key validation failed: {}", e);
                self.set(None, ApiKeyStatus::Invalid);
                false
            }
        }
    }

    fn status(&self) -> ApiKeyStatus {
        self.inner
            .lock()
            .map(|g| g.status)
            .unwrap_or(ApiKeyStatus::Invalid)
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let config = self.ready_config()?;
        let context = Context::prompt(prompt).with_temperature(0.5);
        let response = providers::chat(Provider::OpenAI, config, context)
            .await
            .map_err(|e| {
                ProviderError::new(
                    "openai",
                    format!("Failed to get response from OpenAI. Details: {}", e.message),
                )
            })?;
        Ok(response.content)
    }

    async fn create_container(&self, name: &str) -> Result<String, ProviderError> {
        let config = self.ready_config()?;
        let created = providers::create_container(&config, name).await.map_err(|e| {
            ProviderError::new(
                "openai",
                format!("Failed to create container. Details: {}", e.message),
            )
        })?;
        let pretty = serde_json::to_string_pretty(&created).unwrap_or_else(|_| created.to_string());
        Ok(format!("Container created successfully.\n{}", pretty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  {\"b\":2} "), "{\"b\":2}");
    }

    #[tokio::test]
    async fn test_openai_fails_fast_before_initialize() {
        let service = OpenAiService::new(ProviderSettings::openai());
        assert_eq!(service.status(), ApiKeyStatus::NotSet);
        let err = service.complete("hi").await.unwrap_err();
        assert_eq!(err.message, OPENAI_NOT_READY);
        let err = service.create_container("c").await.unwrap_err();
        assert_eq!(err.message, OPENAI_NOT_READY);
    }

    #[tokio::test]
    async fn test_openai_empty_key_is_not_set() {
        let service = OpenAiService::new(ProviderSettings::openai());
        assert!(!service.initialize("   ").await);
        assert_eq!(service.status(), ApiKeyStatus::NotSet);
    }
}
