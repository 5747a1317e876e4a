//! OpenAI-compatible API provider
//!
//! Chat completions, model listing (used to validate keys) and container creation.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProviderConfig, error_message};
use crate::domain::error::ProviderError;
use crate::infrastructure::llm::{Context, Response, TokenUsage};

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default()
    })
}

fn base_url(config: &ProviderConfig) -> String {
    config
        .base_url
        .clone()
        .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

fn build_request(config: &ProviderConfig, context: Context) -> OpenAIRequest {
    let model = context.model.unwrap_or_else(|| {
        if config.default_model.is_empty() {
            "gpt-4o-mini".to_string()
        } else {
            config.default_model.clone()
        }
    });

    let mut messages = Vec::new();
    if let Some(system) = context.system {
        messages.push(OpenAIMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    messages.extend(context.messages.into_iter().map(|msg| OpenAIMessage {
        role: msg.role.as_str().to_string(),
        content: msg.content,
    }));

    OpenAIRequest {
        model,
        messages,
        temperature: context.temperature,
        max_tokens: context.max_tokens,
    }
}

/// Execute a chat request using OpenAI-compatible API
pub async fn chat(config: ProviderConfig, context: Context) -> Result<Response, ProviderError> {
    let url = format!("{}/chat/completions", base_url(&config));
    let request = build_request(&config, context);

    let mut request_builder = http_client()
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .header("Content-Type", "application/json")
        .json(&request);

    if let Some(timeout) = config.request_timeout() {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| ProviderError::new("openai", format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(error_message("openai", status, &error_text));
    }

    let openai_response: OpenAIResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::new("openai", format!("Failed to parse response: {}", e)))?;

    let Some(choice) = openai_response.choices.into_iter().next() else {
        return Err(ProviderError::new("openai", "No choices in response"));
    };

    let usage = openai_response
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(Response {
        content: choice
            .message
            .content
            .unwrap_or_else(|| "No response from OpenAI.".to_string()),
        model: openai_response.model,
        usage,
        sources: Vec::new(),
    })
}

/// Lists model ids. A successful call proves the key is valid.
pub async fn list_models(config: &ProviderConfig) -> Result<Vec<String>, ProviderError> {
    let url = format!("{}/models", base_url(config));

    let response = http_client()
        .get(&url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .send()
        .await
        .map_err(|e| ProviderError::new("openai", format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(error_message("openai", status, &error_text));
    }

    let list: ModelList = response
        .json()
        .await
        .map_err(|e| ProviderError::new("openai", format!("Failed to parse models: {}", e)))?;

    Ok(list.data.into_iter().map(|m| m.id).collect())
}

/// `POST /containers` and return the created container object.
pub async fn create_container(config: &ProviderConfig, name: &str) -> Result<Value, ProviderError> {
    let url = format!("{}/containers", base_url(config));

    let mut request_builder = http_client()
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "name": name }));

    if let Some(timeout) = config.request_timeout() {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| ProviderError::new("openai", format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(error_message("openai", status, &error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::new("openai", format!("Failed to parse response: {}", e)))
}
