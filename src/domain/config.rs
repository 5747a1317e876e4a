//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for provider credentials, default instructions and system settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`. Every section is optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub instructions: InstructionsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    /// Reads the YAML file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default = "ProviderSettings::gemini")]
    pub gemini: ProviderSettings,
    #[serde(default = "ProviderSettings::openai")]
    pub openai: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: ProviderSettings::gemini(),
            openai: ProviderSettings::openai(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>, // e.g. "GEMINI_API_KEY"
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ProviderSettings {
    pub fn gemini() -> Self {
        Self {
            api_key_env: Some("GEMINI_API_KEY".to_string()),
            model: "gemini-2.5-flash".to_string(),
            ..Default::default()
        }
    }

    pub fn openai() -> Self {
        Self {
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        }
    }
}

/// Default orchestrator and supervisor instructions. Overridden by saved settings.
#[derive(Debug, Deserialize, Clone)]
pub struct InstructionsConfig {
    #[serde(default = "default_orchestrator_instruction")]
    pub orchestrator: String,
    #[serde(default = "default_supervisor_instruction")]
    pub supervisor: String,
}

impl Default for InstructionsConfig {
    fn default() -> Self {
        Self {
            orchestrator: default_orchestrator_instruction(),
            supervisor: default_supervisor_instruction(),
        }
    }
}

fn default_orchestrator_instruction() -> String {
    "Your primary directive is to maximize efficiency and logical coherence. Before assigning any task, evaluate the full project context from previously completed tasks. Your plans must follow a strict dependency order: requirements before design, design before implementation, implementation before testing. For file creation plans, ensure that every generated content block serves a clear purpose and that file paths are structured logically within a 'src' directory. Justify each agent selection with a brief, tactical reason referencing their core skills. Be decisive and authoritative.".to_string()
}

fn default_supervisor_instruction() -> String {
    "Your output must be professional, concise, and directly address the user's request. When generating code, specs, or documents, adhere to industry best practices. For JSON outputs, ensure the response is a single, valid JSON object without any explanatory text or markdown formatting. For markdown outputs, use clear headers, lists, and code blocks to improve readability. Always maintain your assigned persona's core personality traits but prioritize clarity and accuracy above all else. Avoid conversational filler.".to_string()
}

/// Which virtual filesystem backend to boot.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FsMode {
    /// Disk sandbox, falling back to memory if it cannot be prepared.
    #[default]
    Auto,
    Disk,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,
    #[serde(default)]
    pub filesystem: FsMode,
    /// Pause between file-plan steps.
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,
    #[serde(default = "default_tick")]
    pub scheduler_tick_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            workspace_dir: default_workspace_dir(),
            filesystem: FsMode::default(),
            step_delay_ms: default_step_delay(),
            scheduler_tick_ms: default_tick(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_workspace_dir() -> String {
    "data/workspace".to_string()
}
fn default_step_delay() -> u64 {
    500
}
fn default_tick() -> u64 {
    1000
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.providers.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.providers.openai.model, "gpt-4o-mini");
        assert_eq!(config.system.step_delay_ms, 500);
        assert_eq!(config.system.filesystem, FsMode::Auto);
        assert!(config.instructions.supervisor.starts_with("Your output must be professional"));
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
providers:
  gemini:
    api_key: "abc"
    model: "gemini-2.5-pro"
system:
  filesystem: memory
  step_delay_ms: 0
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.providers.gemini.api_key.as_deref(), Some("abc"));
        assert_eq!(config.providers.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.providers.openai.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.system.filesystem, FsMode::Memory);
        assert_eq!(config.system.step_delay_ms, 0);
        assert_eq!(config.system.scheduler_tick_ms, 1000);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("data/x"), PathBuf::from("data/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/ws"), home.join("ws"));
        }
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap();
        assert_eq!(config.system.data_dir, "data");
    }
}
