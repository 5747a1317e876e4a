//! # Domain Errors
//!
//! Error types shared by the layers: provider failures, filesystem failures and
//! scheduled-command lifecycle violations.

use thiserror::Error;

/// Error returned by an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub message: String,
    pub provider: String,
}

impl ProviderError {
    pub fn new(provider: &str, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.provider, self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Errors raised by a virtual filesystem backend.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Directory not found: {0}")]
    NotADirectory(String),
    #[error("Path does not exist: Parent directory '{0}' not found.")]
    MissingParent(String),
    #[error("Cannot create directory, a file with the same name exists: {0}")]
    FileExists(String),
    #[error("Access denied: '{0}' escapes the workspace root")]
    AccessDenied(String),
    #[error("Cannot modify the root directory.")]
    Root,
    #[error("{0} is not supported in mock file system mode.")]
    Unsupported(&'static str),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(String),
}

/// Errors raised when a scheduled command is moved through its lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Scheduled command {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: &'static str,
        to: &'static str,
    },
    #[error("No scheduled command with id {0}")]
    NotFound(String),
}
