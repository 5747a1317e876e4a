//! # Execution Plans
//!
//! Plan dialects produced by the orchestrator LLM and consumed once by the executor:
//! task-assignment plans and file-creation plans. Also holds the explicit
//! shape normalization and validation pass run before a file plan executes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::roster;
use crate::domain::types::Agent;

/// One task assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    pub task_id: String,
    pub agent_name: String,
    #[serde(default)]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileAction {
    GenerateContent,
    WriteFile,
    Unknown(String),
}

impl From<String> for FileAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "GENERATE_CONTENT" => FileAction::GenerateContent,
            "WRITE_FILE" => FileAction::WriteFile,
            _ => FileAction::Unknown(s),
        }
    }
}

impl From<FileAction> for String {
    fn from(a: FileAction) -> Self {
        a.as_str().to_string()
    }
}

impl FileAction {
    pub fn as_str(&self) -> &str {
        match self {
            FileAction::GenerateContent => "GENERATE_CONTENT",
            FileAction::WriteFile => "WRITE_FILE",
            FileAction::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileStepParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_var: Option<String>,
}

/// One step of a file-creation plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileCreationStep {
    pub agent_name: String,
    pub action: FileAction,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub params: FileStepParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_var: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("{0}")]
    Generation(String),
    #[error("Unexpected plan shape: {0}")]
    Shape(String),
    #[error("Step {step}: unknown action type \"{action}\"")]
    UnknownAction { step: usize, action: String },
    #[error("Step {step}: {action} requires '{field}'")]
    MissingField {
        step: usize,
        action: &'static str,
        field: &'static str,
    },
    #[error("Step {step}: content variable \"{var}\" is not produced by an earlier step")]
    UndefinedVariable { step: usize, var: String },
    #[error("Step {step}: agent \"{agent}\" not found")]
    UnknownAgent { step: usize, agent: String },
}

/// Extracts the `plan` array of a task-assignment response.
pub fn parse_task_plan(value: Value) -> Result<Vec<ExecutionStep>, PlanError> {
    let plan = match value {
        Value::Object(mut map) => map
            .remove("plan")
            .ok_or_else(|| PlanError::Shape("missing 'plan' field".to_string()))?,
        Value::Array(_) => value,
        other => return Err(PlanError::Shape(describe(&other).to_string())),
    };
    serde_json::from_value(plan).map_err(|e| PlanError::Shape(e.to_string()))
}

/// Accepts either a bare array of steps or an object wrapping `{ "plan": [...] }`.
pub fn normalize_file_plan(value: Value) -> Result<Vec<FileCreationStep>, PlanError> {
    let steps = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("plan") {
            Some(plan @ Value::Array(_)) => plan,
            Some(other) => {
                return Err(PlanError::Shape(format!("'plan' is {}", describe(&other))));
            }
            None => return Err(PlanError::Shape("object without a 'plan' array".to_string())),
        },
        other => return Err(PlanError::Shape(describe(&other).to_string())),
    };
    serde_json::from_value(steps).map_err(|e| PlanError::Shape(e.to_string()))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Checks the cross-step contract of a file plan before anything runs: every
/// action is known, required params are present, agents exist and every
/// `contentVar` names an `outputVar` of an earlier step.
pub fn validate_file_plan(steps: &[FileCreationStep], agents: &[Agent]) -> Result<(), PlanError> {
    let mut defined: HashSet<&str> = HashSet::new();

    for (idx, step) in steps.iter().enumerate() {
        let n = idx + 1;
        if roster::find(agents, &step.agent_name).is_none() {
            return Err(PlanError::UnknownAgent {
                step: n,
                agent: step.agent_name.clone(),
            });
        }

        match &step.action {
            FileAction::GenerateContent => {
                if step.params.prompt.as_deref().is_none_or(|p| p.trim().is_empty()) {
                    return Err(PlanError::MissingField { step: n, action: "GENERATE_CONTENT", field: "params.prompt" });
                }
                match step.output_var.as_deref() {
                    Some(var) if !var.trim().is_empty() => {
                        defined.insert(var);
                    }
                    _ => {
                        return Err(PlanError::MissingField { step: n, action: "GENERATE_CONTENT", field: "outputVar" });
                    }
                }
            }
            FileAction::WriteFile => {
                if step.params.file_name.as_deref().is_none_or(|f| f.trim().is_empty()) {
                    return Err(PlanError::MissingField { step: n, action: "WRITE_FILE", field: "params.fileName" });
                }
                let Some(var) = step.params.content_var.as_deref() else {
                    return Err(PlanError::MissingField { step: n, action: "WRITE_FILE", field: "params.contentVar" });
                };
                if !defined.contains(var) {
                    return Err(PlanError::UndefinedVariable { step: n, var: var.to_string() });
                }
            }
            FileAction::Unknown(raw) => {
                return Err(PlanError::UnknownAction { step: n, action: raw.clone() });
            }
        }
    }
    Ok(())
}
