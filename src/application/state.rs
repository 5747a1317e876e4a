//! # Application State
//!
//! `AppState` holds everything the handlers mutate: task catalog, agent roster,
//! active agent, logbook, scheduled commands, settings and the console log.
//! `AppContext` bundles the state with the collaborators and is passed
//! explicitly to every handler.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::application::tasks::TaskRegistry;
use crate::domain::catalog::{TaskId, default_tasks};
use crate::domain::config::AppConfig;
use crate::domain::roster::{self, ORCHESTRATOR, default_agents};
use crate::domain::traits::{ContainerProvider, LlmGateway, Prompter, Store, VirtualFs};
use crate::domain::types::{
    Agent, ConsoleMessage, LogEntry, MessageSource, ScheduleStatus, ScheduledCommand, Settings, Task,
};
use crate::strings::{messages, prompts};

#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    Message(ConsoleMessage),
    Cleared,
}

/// Append-only transcript, forwarded to an optional listener (the printer).
#[derive(Debug, Default)]
pub struct ConsoleLog {
    messages: Vec<ConsoleMessage>,
    listener: Option<mpsc::UnboundedSender<ConsoleEvent>>,
}

impl ConsoleLog {
    pub fn with_listener(listener: mpsc::UnboundedSender<ConsoleEvent>) -> Self {
        Self {
            messages: Vec::new(),
            listener: Some(listener),
        }
    }

    pub fn push(&mut self, message: ConsoleMessage) {
        if let Some(tx) = &self.listener {
            // Printer gone means the session is shutting down.
            let _ = tx.send(ConsoleEvent::Message(message.clone()));
        }
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        if let Some(tx) = &self.listener {
            let _ = tx.send(ConsoleEvent::Cleared);
        }
    }

    pub fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }
}

#[derive(Debug)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub agents: Vec<Agent>,
    pub active_agent: String,
    pub logbook: Vec<LogEntry>,
    pub scheduled: Vec<ScheduledCommand>,
    pub settings: Settings,
    pub orchestrator_instruction: String,
    pub supervisor_instruction: String,
    pub console: ConsoleLog,
}

impl AppState {
    pub fn new(config: &AppConfig, console: ConsoleLog) -> Self {
        Self {
            tasks: default_tasks(),
            agents: default_agents(),
            active_agent: ORCHESTRATOR.to_string(),
            logbook: Vec::new(),
            scheduled: Vec::new(),
            settings: Settings::default(),
            orchestrator_instruction: config.instructions.orchestrator.clone(),
            supervisor_instruction: config.instructions.supervisor.clone(),
            console,
        }
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        roster::find(&self.agents, name)
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.is_named(name))
    }

    pub fn active_agent(&self) -> Option<&Agent> {
        self.agent(&self.active_agent)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn say(&mut self, source: MessageSource, agent: Option<&str>, content: impl Into<String>) {
        self.console
            .push(ConsoleMessage::new(source, agent.map(str::to_string), content));
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<Mutex<AppState>>,
    pub llm: Arc<dyn LlmGateway>,
    pub openai: Arc<dyn ContainerProvider>,
    pub fs: Arc<dyn VirtualFs>,
    pub store: Arc<dyn Store>,
    pub prompter: Arc<dyn Prompter>,
    pub config: Arc<AppConfig>,
    pub registry: Arc<TaskRegistry>,
}

impl AppContext {
    pub async fn system(&self, content: impl Into<String>) {
        self.state.lock().await.say(MessageSource::System, None, content);
    }

    pub async fn orchestrator(&self, content: impl Into<String>) {
        self.state.lock().await.say(MessageSource::Orchestrator, None, content);
    }

    pub async fn ai(&self, agent: &str, content: impl Into<String>) {
        self.state.lock().await.say(MessageSource::Ai, Some(agent), content);
    }

    pub async fn user(&self, content: impl Into<String>) {
        self.state.lock().await.say(MessageSource::User, None, content);
    }

    /// Name and persona prompt (with supervisor instruction) of a named agent.
    pub async fn persona(&self, name: &str) -> Result<(String, String)> {
        let state = self.state.lock().await;
        let agent = state
            .agent(name)
            .ok_or_else(|| anyhow::anyhow!("Agent \"{}\" not found.", name))?;
        Ok((
            agent.name.clone(),
            prompts::agent_prompt(agent, &state.supervisor_instruction),
        ))
    }

    /// Same as [`persona`](Self::persona) for the active agent.
    pub async fn active_persona(&self) -> Result<(String, String)> {
        let name = self.state.lock().await.active_agent.clone();
        self.persona(&name).await
    }

    pub async fn persist_tasks(&self) {
        let tasks = self.state.lock().await.tasks.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_tasks(&tasks).await {
                tracing::error!("Failed to persist tasks: {:#}", e);
            }
        });
    }

    pub async fn persist_agents(&self) {
        let agents = self.state.lock().await.agents.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_agents(&agents).await {
                tracing::error!("Failed to persist agents: {:#}", e);
            }
        });
    }

    pub async fn persist_scheduled(&self) {
        let scheduled = self.state.lock().await.scheduled.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_scheduled(&scheduled).await {
                tracing::error!("Failed to persist scheduled commands: {:#}", e);
            }
        });
    }

    pub async fn persist_settings(&self) {
        let settings = self.state.lock().await.settings.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_settings(&settings).await {
                tracing::error!("Failed to persist settings: {:#}", e);
            }
        });
    }

    /// Restores persisted collections into the state. Read failures are logged
    /// and the defaults kept.
    pub async fn hydrate(&self) {
        let tasks = self.store.get_tasks().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load tasks: {:#}", e);
            Vec::new()
        });
        let agents = self.store.get_agents().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load agents: {:#}", e);
            Vec::new()
        });
        let logbook = self.store.get_logbook().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load logbook: {:#}", e);
            Vec::new()
        });
        let mut scheduled = self.store.get_scheduled().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load scheduled commands: {:#}", e);
            Vec::new()
        });
        let settings = self.store.get_settings().await.unwrap_or_else(|e| {
            tracing::error!("Failed to load settings: {:#}", e);
            Settings::default()
        });

        // A command left EXECUTING by a previous session never settled.
        let mut interrupted = 0;
        for cmd in scheduled.iter_mut() {
            if cmd.status() == ScheduleStatus::Executing && cmd.transition(ScheduleStatus::Failed).is_ok() {
                interrupted += 1;
            }
        }
        if interrupted > 0 {
            tracing::warn!("Marked {} interrupted scheduled command(s) as FAILED", interrupted);
        }

        let mut state = self.state.lock().await;
        if !tasks.is_empty() {
            state.tasks = merge_catalog(tasks);
        }
        if !agents.is_empty() {
            state.agents = agents;
        }
        state.logbook = logbook;
        state.scheduled = scheduled;
        if let Some(o) = settings.orchestrator_instruction.clone() {
            state.orchestrator_instruction = o;
        }
        if let Some(s) = settings.supervisor_instruction.clone() {
            state.supervisor_instruction = s;
        }
        state.settings = settings;
        tracing::info!(
            "State restored: {} tasks, {} agents, {} log entries, {} scheduled",
            state.tasks.len(),
            state.agents.len(),
            state.logbook.len(),
            state.scheduled.len()
        );
    }
}

/// Keeps the catalog order and text, taking status and details from the
/// persisted copy of each task.
fn merge_catalog(persisted: Vec<Task>) -> Vec<Task> {
    default_tasks()
        .into_iter()
        .map(|fresh| {
            persisted
                .iter()
                .find(|p| p.id == fresh.id)
                .cloned()
                .unwrap_or(fresh)
        })
        .collect()
}

pub fn welcome(state: &mut AppState, mock_fs: bool) {
    state.say(MessageSource::System, None, messages::WELCOME);
    if mock_fs {
        state.say(MessageSource::System, None, messages::MOCK_FS_NOTICE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context};
    use crate::domain::types::TaskStatus;

    #[tokio::test]
    async fn test_console_listener_receives_messages() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut console = ConsoleLog::with_listener(tx);
        console.push(ConsoleMessage::new(MessageSource::System, None, "hi"));
        console.clear();
        assert!(matches!(rx.recv().await, Some(ConsoleEvent::Message(m)) if m.content == "hi"));
        assert!(matches!(rx.recv().await, Some(ConsoleEvent::Cleared)));
        assert!(console.messages().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_restores_persisted_state() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        let mut tasks = default_tasks();
        tasks[3].complete("proto");
        ctx.store.save_tasks(&tasks[..5]).await.unwrap();
        let mut agents = default_agents();
        agents[0].strategic_notes.push("note".into());
        ctx.store.save_agents(&agents).await.unwrap();
        ctx.store
            .save_settings(&Settings {
                supervisor_instruction: Some("terse".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        ctx.hydrate().await;

        let state = ctx.state.lock().await;
        assert_eq!(state.tasks.len(), TaskId::ALL.len());
        assert_eq!(state.task(TaskId::ProtoSpec).unwrap().status(), TaskStatus::Complete);
        assert_eq!(state.task(TaskId::DocsPlan).unwrap().status(), TaskStatus::Pending);
        assert_eq!(state.agents[0].strategic_notes, vec!["note"]);
        assert_eq!(state.supervisor_instruction, "terse");
    }

    #[tokio::test]
    async fn test_hydrate_fails_interrupted_commands() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        let mut cmd = ScheduledCommand::new("/tasks", chrono::Utc::now());
        cmd.transition(ScheduleStatus::Executing).unwrap();
        ctx.store.save_scheduled(&[cmd]).await.unwrap();

        ctx.hydrate().await;

        let state = ctx.state.lock().await;
        assert_eq!(state.scheduled[0].status(), ScheduleStatus::Failed);
    }
}
