//! # Domain Types
//!
//! Data structures shared across the console: agents, tasks, scheduled commands,
//! console messages and the persisted logbook/settings records.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::TaskId;
use crate::domain::error::ScheduleError;

/// A named persona that can execute tasks and answer questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    pub role: String,
    pub skills: Vec<String>,
    pub personality_prompt: String,
    #[serde(default)]
    pub strategic_notes: Vec<String>,
}

impl Agent {
    pub fn new(name: &str, role: &str, skills: &[&str], personality_prompt: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            personality_prompt: personality_prompt.to_string(),
            strategic_notes: Vec::new(),
        }
    }

    /// Case-insensitive name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// Project phases, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    LogicalArchitecture,
    StructuredDevelopment,
    ControlledDeployment,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::LogicalArchitecture => "Phase 1: Logical Architecture & Resource Allocation",
            Phase::StructuredDevelopment => "Phase 2: Structured Development",
            Phase::ControlledDeployment => "Phase 3: Controlled Deployment & Maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(dead_code)]
pub enum TaskStatus {
    Pending,
    Analyzing,
    InProgress,
    Complete,
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Analyzing => "ANALYZING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Complete => "COMPLETE",
            TaskStatus::Error => "ERROR",
        }
    }
}

pub const EMPTY_RESULT: &str = "(empty result)";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One unit of the project catalog.
///
/// `status` and `details` only change together through [`Task::begin`],
/// [`Task::complete`], [`Task::fail`] and [`Task::reset`], which keeps
/// `details` present exactly when the task is `COMPLETE` or `ERROR`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub phase: Phase,
    status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    pub actionable: bool,
    pub action_label: String,
}

impl Task {
    pub fn new(id: TaskId, title: &str, description: &str, phase: Phase, action_label: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            phase,
            status: TaskStatus::Pending,
            details: None,
            actionable: true,
            action_label: action_label.to_string(),
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Marks the task as in flight.
    pub fn begin(&mut self) {
        self.status = TaskStatus::Analyzing;
        self.details = None;
    }

    pub fn complete(&mut self, result: impl Into<String>) {
        let result = result.into();
        self.status = TaskStatus::Complete;
        self.details = Some(if result.trim().is_empty() {
            EMPTY_RESULT.to_string()
        } else {
            result
        });
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = TaskStatus::Error;
        self.details = Some(if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        });
    }

    /// Back to PENDING. Only the cancel path of an interactive task uses this.
    pub fn reset(&mut self) {
        self.status = TaskStatus::Pending;
        self.details = None;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Pending,
    Executing,
    Complete,
    Failed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "PENDING",
            ScheduleStatus::Executing => "EXECUTING",
            ScheduleStatus::Complete => "COMPLETE",
            ScheduleStatus::Failed => "FAILED",
            ScheduleStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A command queued for future execution by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCommand {
    pub id: String,
    pub command: String,
    execute_at: DateTime<Utc>,
    status: ScheduleStatus,
}

impl ScheduledCommand {
    pub fn new(command: impl Into<String>, execute_at: DateTime<Utc>) -> Self {
        Self {
            id: format!("cmd-{}", uuid::Uuid::new_v4().simple()),
            command: command.into(),
            execute_at,
            status: ScheduleStatus::Pending,
        }
    }

    pub fn execute_at(&self) -> DateTime<Utc> {
        self.execute_at
    }

    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == ScheduleStatus::Pending && now >= self.execute_at
    }

    /// Moves the command forward. Allowed: PENDING→EXECUTING, PENDING→CANCELLED,
    /// EXECUTING→COMPLETE and EXECUTING→FAILED.
    pub fn transition(&mut self, to: ScheduleStatus) -> Result<(), ScheduleError> {
        use ScheduleStatus::*;
        let allowed = matches!(
            (self.status, to),
            (Pending, Executing) | (Pending, Cancelled) | (Executing, Complete) | (Executing, Failed)
        );
        if !allowed {
            return Err(ScheduleError::InvalidTransition {
                id: self.id.clone(),
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    User,
    System,
    Ai,
    Orchestrator,
}

/// One line of the console transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleMessage {
    pub id: String,
    pub source: MessageSource,
    pub agent_name: Option<String>,
    pub content: String,
    pub timestamp: String,
}

impl ConsoleMessage {
    pub fn new(source: MessageSource, agent_name: Option<String>, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg-{}", uuid::Uuid::new_v4().simple()),
            source,
            agent_name,
            content: content.into(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn prefix(&self) -> String {
        match self.source {
            MessageSource::User => "[USER] >".to_string(),
            MessageSource::System => "[SYSTEM] ::".to_string(),
            MessageSource::Ai => format!(
                "[{}] >>",
                self.agent_name.as_deref().unwrap_or("AI").to_uppercase()
            ),
            MessageSource::Orchestrator => "[ANDOY] ::".to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{} {} {}", self.timestamp, self.prefix(), self.content)
    }
}

/// Persistent logbook entry written by `/log`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: format!("log-{}", uuid::Uuid::new_v4().simple()),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// User settings persisted between sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub orchestrator_instruction: Option<String>,
    #[serde(default)]
    pub supervisor_instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Valid,
    Invalid,
    NotSet,
    Validating,
}

impl ApiKeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyStatus::Valid => "VALID",
            ApiKeyStatus::Invalid => "INVALID",
            ApiKeyStatus::NotSet => "NOT_SET",
            ApiKeyStatus::Validating => "VALIDATING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Entry of a filesystem tree listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSystemNode {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub children: Vec<FileSystemNode>,
}

/// A web-grounded research answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Research {
    pub summary: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub title: Option<String>,
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task() -> Task {
        Task::new(TaskId::ReqSpec, "Requirement Specification", "desc", Phase::LogicalArchitecture, "Go")
    }

    fn details_iff_terminal(t: &Task) -> bool {
        let terminal = matches!(t.status(), TaskStatus::Complete | TaskStatus::Error);
        terminal == t.details().is_some_and(|d| !d.is_empty())
    }

    #[test]
    fn test_task_details_follow_status() {
        let mut t = task();
        assert!(details_iff_terminal(&t));
        t.begin();
        assert_eq!(t.status(), TaskStatus::Analyzing);
        assert!(details_iff_terminal(&t));
        t.complete("done");
        assert_eq!(t.details(), Some("done"));
        assert!(details_iff_terminal(&t));
        t.begin();
        assert!(t.details().is_none());
        t.fail("");
        assert_eq!(t.details(), Some(UNKNOWN_ERROR));
        assert!(details_iff_terminal(&t));
        t.reset();
        assert!(details_iff_terminal(&t));
    }

    #[test]
    fn test_task_empty_result_is_recorded() {
        let mut t = task();
        t.complete("   ");
        assert_eq!(t.details(), Some(EMPTY_RESULT));
    }

    #[test]
    fn test_schedule_transitions_only_forward() {
        let at = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
        let mut cmd = ScheduledCommand::new("/tasks", at);
        assert!(cmd.transition(ScheduleStatus::Complete).is_err());
        cmd.transition(ScheduleStatus::Executing).unwrap();
        assert!(cmd.transition(ScheduleStatus::Pending).is_err());
        assert!(cmd.transition(ScheduleStatus::Cancelled).is_err());
        cmd.transition(ScheduleStatus::Failed).unwrap();
        assert!(cmd.transition(ScheduleStatus::Complete).is_err());
        assert_eq!(cmd.execute_at(), at);

        let mut cancelled = ScheduledCommand::new("/tasks", at);
        cancelled.transition(ScheduleStatus::Cancelled).unwrap();
        assert!(cancelled.transition(ScheduleStatus::Executing).is_err());
        assert!(!cancelled.is_due(at));
    }

    #[test]
    fn test_task_serializes_flat_status_and_details() {
        let mut t = task();
        t.complete("result");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["id"], "req_spec");
        assert_eq!(json["status"], "COMPLETE");
        assert_eq!(json["details"], "result");
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_console_prefixes() {
        let ai = ConsoleMessage::new(MessageSource::Ai, Some("Adam".into()), "hi");
        assert_eq!(ai.prefix(), "[ADAM] >>");
        let sys = ConsoleMessage::new(MessageSource::System, None, "x");
        assert_eq!(sys.prefix(), "[SYSTEM] ::");
    }
}
