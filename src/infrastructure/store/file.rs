//! JSON file-based store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::traits::Store;
use crate::domain::types::{Agent, LogEntry, ScheduledCommand, Settings, Task};

const TASKS: &str = "tasks.json";
const AGENTS: &str = "agents.json";
const SCHEDULED: &str = "scheduled.json";
const SETTINGS: &str = "settings.json";
const LOGBOOK: &str = "logbook.jsonl";

pub struct JsonStore {
    dir: PathBuf,
    persist_lock: Mutex<()>,
}

impl JsonStore {
    pub async fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            persist_lock: Mutex::new(()),
        })
    }

    /// Missing file reads as the default value.
    async fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Whole-file overwrite through a temp file and rename.
    async fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        let path = self.dir.join(name);
        let data = serde_json::to_vec_pretty(value).context("Failed to serialize store data")?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, data)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to finalize {}", path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn get_tasks(&self) -> Result<Vec<Task>> {
        self.read(TASKS).await
    }

    async fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write(TASKS, tasks).await
    }

    async fn get_agents(&self) -> Result<Vec<Agent>> {
        self.read(AGENTS).await
    }

    async fn save_agents(&self, agents: &[Agent]) -> Result<()> {
        self.write(AGENTS, agents).await
    }

    async fn get_logbook(&self) -> Result<Vec<LogEntry>> {
        let path = self.dir.join(LOGBOOK);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err).with_context(|| format!("Failed to read {}", path.display())),
        };
        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Skipping malformed logbook line {}: {}", idx + 1, e),
            }
        }
        Ok(entries)
    }

    async fn add_log_entry(&self, entry: &LogEntry) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        let path = self.dir.join(LOGBOOK);
        let mut line = serde_json::to_string(entry).context("Failed to serialize log entry")?;
        line.push('\n');
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn get_scheduled(&self) -> Result<Vec<ScheduledCommand>> {
        self.read(SCHEDULED).await
    }

    async fn save_scheduled(&self, commands: &[ScheduledCommand]) -> Result<()> {
        self.write(SCHEDULED, commands).await
    }

    async fn get_settings(&self) -> Result<Settings> {
        self.read(SETTINGS).await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write(SETTINGS, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{TaskId, default_tasks};
    use crate::domain::roster::default_agents;

    #[tokio::test]
    async fn test_empty_store_reads_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(tmp.path()).await.unwrap();
        assert!(store.get_tasks().await.unwrap().is_empty());
        assert!(store.get_logbook().await.unwrap().is_empty());
        assert_eq!(store.get_settings().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_tasks_round_trip_keeps_status_and_details() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(tmp.path()).await.unwrap();
        let mut tasks = default_tasks();
        tasks[0].complete("{\"functional_requirements\": []}");
        tasks[1].fail("[gemini] quota exceeded");
        store.save_tasks(&tasks).await.unwrap();

        let reopened = JsonStore::new(tmp.path()).await.unwrap();
        let loaded = reopened.get_tasks().await.unwrap();
        let summary = |ts: &[Task]| {
            ts.iter()
                .map(|t| (t.id, t.status(), t.details().map(str::to_string)))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&loaded), summary(&tasks));
        assert_eq!(loaded[0].id, TaskId::ReqSpec);
    }

    #[tokio::test]
    async fn test_logbook_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(tmp.path()).await.unwrap();
        store.add_log_entry(&LogEntry::new("first")).await.unwrap();
        store.add_log_entry(&LogEntry::new("second")).await.unwrap();
        let log = store.get_logbook().await.unwrap();
        assert_eq!(log.iter().map(|e| e.content.as_str()).collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_agents_and_settings_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonStore::new(tmp.path()).await.unwrap();
        let mut agents = default_agents();
        agents[1].strategic_notes.push("Prefer Rust".into());
        store.save_agents(&agents).await.unwrap();
        assert_eq!(store.get_agents().await.unwrap(), agents);

        let settings = Settings {
            openai_api_key: Some("sk-test".into()),
            ..Default::default()
        };
        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), settings);
    }
}
