//! In-memory store (non-persistent).

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::traits::Store;
use crate::domain::types::{Agent, LogEntry, ScheduledCommand, Settings, Task};

#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    agents: RwLock<Vec<Agent>>,
    logbook: RwLock<Vec<LogEntry>>,
    scheduled: RwLock<Vec<ScheduledCommand>>,
    settings: RwLock<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.write().await = tasks.to_vec();
        Ok(())
    }

    async fn get_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.agents.read().await.clone())
    }

    async fn save_agents(&self, agents: &[Agent]) -> Result<()> {
        *self.agents.write().await = agents.to_vec();
        Ok(())
    }

    async fn get_logbook(&self) -> Result<Vec<LogEntry>> {
        Ok(self.logbook.read().await.clone())
    }

    async fn add_log_entry(&self, entry: &LogEntry) -> Result<()> {
        self.logbook.write().await.push(entry.clone());
        Ok(())
    }

    async fn get_scheduled(&self) -> Result<Vec<ScheduledCommand>> {
        Ok(self.scheduled.read().await.clone())
    }

    async fn save_scheduled(&self, commands: &[ScheduledCommand]) -> Result<()> {
        *self.scheduled.write().await = commands.to_vec();
        Ok(())
    }

    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}
