//! Gemini provider
//!
//! Supports system instructions, schema-constrained JSON responses and
//! Google Search grounding on the `generateContent` endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProviderConfig, error_message};
use crate::domain::error::ProviderError;
use crate::domain::types::Source;
use crate::infrastructure::llm::{Context, MessageRole, Response, TokenUsage};

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

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

/// Gemini content (message)
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini content part
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

/// Gemini response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

/// Gemini usage metadata
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

fn build_request(context: &Context) -> GeminiRequest {
    let contents = context
        .messages
        .iter()
        .map(|msg| GeminiContent {
            role: Some(
                match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: msg.content.clone(),
            }],
        })
        .collect();

    let system_instruction = context.system.as_ref().map(|text| GeminiContent {
        role: None,
        parts: vec![GeminiPart { text: text.clone() }],
    });

    let wants_config = context.temperature.is_some()
        || context.max_tokens.is_some()
        || context.response_schema.is_some();
    let generation_config = wants_config.then(|| GenerationConfig {
        temperature: context.temperature,
        max_output_tokens: context.max_tokens,
        response_mime_type: context
            .response_schema
            .as_ref()
            .map(|_| "application/json".to_string()),
        response_schema: context.response_schema.clone(),
    });

    let tools = if context.grounding {
        vec![serde_json::json!({ "googleSearch": {} })]
    } else {
        Vec::new()
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config,
        tools,
    }
}

/// Execute a chat request using Gemini's API
pub async fn chat(config: ProviderConfig, context: Context) -> Result<Response, ProviderError> {
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string());

    let model = context.model.clone().unwrap_or_else(|| {
        if config.default_model.is_empty() {
            "gemini-2.5-flash".to_string()
        } else {
            config.default_model.clone()
        }
    });

    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        base_url, model, config.api_key
    );

    let request = build_request(&context);

    let mut request_builder = http_client()
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&request);

    if let Some(timeout) = config.request_timeout() {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| ProviderError::new("gemini", format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(error_message("gemini", status, &error_text));
    }

    let gemini_response: GeminiResponse = response
        .json()
        .await
        .map_err(|e| ProviderError::new("gemini", format!("Failed to parse response: {}", e)))?;

    parse_response(gemini_response, model)
}

fn parse_response(gemini_response: GeminiResponse, model: String) -> Result<Response, ProviderError> {
    let Some(candidate) = gemini_response.candidates.into_iter().next() else {
        return Err(ProviderError::new("gemini", "No candidates in response"));
    };

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|part| part.text).collect::<Vec<_>>().join(""))
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|meta| {
            meta.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    web.uri.map(|uri| Source {
                        title: web.title,
                        uri,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let usage = gemini_response.usage_metadata.unwrap_or_default();

    Ok(Response {
        content,
        model,
        usage: TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        },
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_carries_schema_and_system() {
        let ctx = Context::prompt("plan it")
            .with_system("You are Andoy")
            .with_temperature(0.1)
            .with_schema(json!({"type": "OBJECT"}));
        let body = serde_json::to_value(build_request(&ctx)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are Andoy");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_request_with_grounding() {
        let ctx = Context::prompt("topic").with_grounding();
        let body = serde_json::to_value(build_request(&ctx)).unwrap();
        assert_eq!(body["tools"][0], json!({"googleSearch": {}}));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_parse_grounded_response() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Sum"}, {"text": "mary"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"retrievedContext": {}}
                ]}
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
        });
        let parsed: GeminiResponse = serde_json::from_value(raw).unwrap();
        let response = parse_response(parsed, "m".into()).unwrap();
        assert_eq!(response.content, "Summary");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].uri, "https://a.example");
        assert_eq!(response.usage.total_tokens, 5);
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let parsed: GeminiResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(parse_response(parsed, "m".into()).is_err());
    }
}
