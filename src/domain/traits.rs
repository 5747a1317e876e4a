//! # Domain Traits
//!
//! Abstract interfaces for the collaborators of the console (LLM providers,
//! virtual filesystem, persistence, interactive prompts).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::{FsError, ProviderError};
use crate::domain::types::{
    Agent, ApiKeyStatus, FileSystemNode, LogEntry, Research, ScheduledCommand, Settings, Task,
};

/// Provider A: text, schema-constrained JSON and web-grounded research.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str, temperature: f32) -> Result<String, ProviderError>;

    /// Completion constrained by a response schema, parsed as JSON.
    async fn complete_json(
        &self,
        prompt: &str,
        system: &str,
        schema: Value,
        temperature: f32,
    ) -> Result<Value, ProviderError>;

    async fn research(&self, topic: &str, system: &str) -> Result<Research, ProviderError>;
}

/// Provider B: keyed at runtime, used for terminal prompts and container creation.
#[async_trait]
pub trait ContainerProvider: Send + Sync {
    /// Validates the key. Returns true when the provider is usable afterwards.
    async fn initialize(&self, api_key: &str) -> bool;

    fn status(&self) -> ApiKeyStatus;

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    async fn create_container(&self, name: &str) -> Result<String, ProviderError>;
}

/// Sandboxed file store addressed by absolute virtual paths (`/docs/a.md`).
#[async_trait]
pub trait VirtualFs: Send + Sync {
    /// True when running on the in-memory fallback.
    fn is_mock(&self) -> bool;

    /// Entry names of a directory; directories carry a trailing `/`.
    async fn list(&self, path: &str) -> Result<Vec<String>, FsError>;
    async fn read(&self, path: &str) -> Result<String, FsError>;
    /// Creates or overwrites a file, creating missing parent directories.
    async fn write(&self, path: &str, content: &str) -> Result<(), FsError>;
    async fn mkdir(&self, path: &str) -> Result<(), FsError>;
    async fn remove(&self, path: &str) -> Result<(), FsError>;
    async fn tree(&self, path: &str) -> Result<Vec<FileSystemNode>, FsError>;
    /// Archives a directory next to itself and returns the archive path.
    async fn zip(&self, dir: &str) -> Result<String, FsError>;
    /// Extracts an archive into its parent directory.
    async fn unzip(&self, path: &str) -> Result<(), FsError>;
}

/// Persistence for everything that survives a restart.
/// Collections are overwritten whole, except the append-only logbook.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_tasks(&self) -> anyhow::Result<Vec<Task>>;
    async fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()>;
    async fn get_agents(&self) -> anyhow::Result<Vec<Agent>>;
    async fn save_agents(&self, agents: &[Agent]) -> anyhow::Result<()>;
    async fn get_logbook(&self) -> anyhow::Result<Vec<LogEntry>>;
    async fn add_log_entry(&self, entry: &LogEntry) -> anyhow::Result<()>;
    async fn get_scheduled(&self) -> anyhow::Result<Vec<ScheduledCommand>>;
    async fn save_scheduled(&self, commands: &[ScheduledCommand]) -> anyhow::Result<()>;
    async fn get_settings(&self) -> anyhow::Result<Settings>;
    async fn save_settings(&self, settings: &Settings) -> anyhow::Result<()>;
}

/// Interactive question to the user. `None` means the user declined.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, question: &str, default: &str) -> Option<String>;
}
