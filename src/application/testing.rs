//! Test doubles for the collaborators and a context builder wired to them.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::application::state::{AppContext, AppState, ConsoleLog};
use crate::application::tasks::TaskRegistry;
use crate::domain::config::AppConfig;
use crate::domain::error::ProviderError;
use crate::domain::traits::{ContainerProvider, LlmGateway, Prompter};
use crate::domain::types::{ApiKeyStatus, Research};
use crate::infrastructure::fs::MemoryFs;
use crate::infrastructure::store::MemoryStore;

/// Gateway answering from a queue. Once the queue is drained it repeats
/// `fallback` or reports an error.
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(responses: Vec<&str>) -> Arc<Self> {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(responses: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn repeating(text: &str) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    async fn next(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());
        match self.responses.lock().await.pop_front() {
            Some(response) => response,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ProviderError::new("scripted", "scripted gateway ran out of responses")),
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, prompt: &str, _system: &str, _temperature: f32) -> Result<String, ProviderError> {
        self.next(prompt).await
    }

    async fn complete_json(
        &self,
        prompt: &str,
        _system: &str,
        _schema: Value,
        _temperature: f32,
    ) -> Result<Value, ProviderError> {
        let text = self.next(prompt).await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::new("scripted", e.to_string()))
    }

    async fn research(&self, topic: &str, _system: &str) -> Result<Research, ProviderError> {
        let summary = self.next(topic).await?;
        Ok(Research {
            summary,
            sources: Vec::new(),
        })
    }
}

/// Container provider that is always ready and echoes the name.
pub struct FakeContainers;

#[async_trait]
impl ContainerProvider for FakeContainers {
    async fn initialize(&self, api_key: &str) -> bool {
        api_key.starts_with("sk-")
    }

    fn status(&self) -> ApiKeyStatus {
        ApiKeyStatus::Valid
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("openai: {}", prompt))
    }

    async fn create_container(&self, name: &str) -> Result<String, ProviderError> {
        Ok(format!("Container created successfully.\n{{\"name\": \"{}\"}}", name))
    }
}

/// Prompter replaying fixed answers; `None` entries decline.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(str::to_string)).collect()),
        })
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, _question: &str, default: &str) -> Option<String> {
        match self.answers.lock().await.pop_front() {
            Some(answer) => answer,
            None => Some(default.to_string()),
        }
    }
}

pub fn test_context(llm: Arc<ScriptedGateway>) -> AppContext {
    test_context_with(llm, ScriptedPrompter::new(vec![]))
}

pub fn test_context_with(llm: Arc<ScriptedGateway>, prompter: Arc<ScriptedPrompter>) -> AppContext {
    let mut config = AppConfig::default();
    config.system.step_delay_ms = 0;
    let state = AppState::new(&config, ConsoleLog::default());
    AppContext {
        state: Arc::new(Mutex::new(state)),
        llm,
        openai: Arc::new(FakeContainers),
        fs: Arc::new(MemoryFs::new()),
        store: Arc::new(MemoryStore::new()),
        prompter,
        config: Arc::new(config),
        registry: Arc::new(TaskRegistry::with_defaults()),
    }
}

/// Console contents, oldest first.
pub async fn transcript(ctx: &AppContext) -> Vec<String> {
    ctx.state
        .lock()
        .await
        .console
        .messages()
        .iter()
        .map(|m| m.content.clone())
        .collect()
}
