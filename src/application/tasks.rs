//! # Task Invocation
//!
//! Runs a single catalog task with a chosen agent. Each `TaskId` maps to a
//! generator in the `TaskRegistry`; the registry is checked for completeness
//! at startup.

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde_json::{Value, json};
use std::collections::HashMap;
use thiserror::Error;

use crate::application::state::AppContext;
use crate::application::workflows::{self, COLLAB_NARRATION};
use crate::domain::catalog::TaskId;
use crate::domain::types::{Agent, MessageSource};
use crate::strings::{messages, prompts};

/// Everything a generator needs, captured when the task starts.
pub struct TaskInput {
    pub ctx: AppContext,
    pub task_id: TaskId,
    pub agent: Agent,
    /// Persona, supervisor instruction and strategic notes.
    pub system: String,
    /// Outputs of the tasks completed so far.
    pub context: String,
}

#[derive(Debug, PartialEq)]
pub enum TaskResult {
    Done(String),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Failed,
    Cancelled,
    /// Unknown task or agent; nothing ran.
    Skipped,
}

pub type TaskHandler = fn(TaskInput) -> BoxFuture<'static, Result<TaskResult>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No handler registered for task(s): {0}")]
    Missing(String),
}

#[derive(Default)]
pub struct TaskRegistry {
    handlers: HashMap<TaskId, TaskHandler>,
}

impl TaskRegistry {
    pub fn register(&mut self, id: TaskId, handler: TaskHandler) {
        self.handlers.insert(id, handler);
    }

    pub fn get(&self, id: TaskId) -> Option<TaskHandler> {
        self.handlers.get(&id).copied()
    }

    /// Every catalog task must have a handler.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let missing: Vec<&str> = TaskId::ALL
            .iter()
            .filter(|id| !self.handlers.contains_key(id))
            .map(|id| id.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Missing(missing.join(", ")))
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(TaskId::ReqSpec, |i| Box::pin(req_spec(i)));
        registry.register(TaskId::SysDesign, |i| Box::pin(sys_design(i)));
        registry.register(TaskId::ResProc, |i| Box::pin(res_proc(i)));
        registry.register(TaskId::ProtoSpec, |i| Box::pin(proto_spec(i)));
        registry.register(TaskId::ModPlan, |i| Box::pin(mod_plan(i)));
        registry.register(TaskId::TestPlan, |i| Box::pin(test_plan(i)));
        registry.register(TaskId::CodeReview, |i| Box::pin(code_review(i)));
        registry.register(TaskId::CreateContainer, |i| Box::pin(create_container(i)));
        registry.register(TaskId::RolloutPlan, |i| Box::pin(rollout_plan(i)));
        registry.register(TaskId::MonitorPlan, |i| Box::pin(monitor_plan(i)));
        registry.register(TaskId::DocsPlan, |i| Box::pin(docs_plan(i)));
        registry.register(TaskId::BlogPostCollab, |i| Box::pin(blog_post_collab(i)));
        registry
    }
}

/// Runs one task. The agent is `agent_override` or the active agent.
pub async fn invoke_task(ctx: &AppContext, task_id: &str, agent_override: Option<&str>) -> TaskOutcome {
    let Some(id) = TaskId::from_str(task_id) else {
        tracing::warn!("invoke_task: unknown task id '{}'", task_id);
        return TaskOutcome::Skipped;
    };

    let (agent, title, system, context) = {
        let mut state = ctx.state.lock().await;
        let agent = match agent_override {
            Some(name) => state.agent(name).cloned(),
            None => state.active_agent().cloned(),
        };
        let Some(agent) = agent else {
            tracing::warn!("invoke_task: no agent for task {} (override {:?})", id, agent_override);
            return TaskOutcome::Skipped;
        };
        let system = prompts::task_prompt(&agent, &state.supervisor_instruction);
        let context = prompts::completed_context(&state.tasks);
        let Some(task) = state.task_mut(id) else {
            return TaskOutcome::Skipped;
        };
        task.begin();
        let title = task.title.clone();
        state.say(
            MessageSource::Ai,
            Some(&agent.name),
            messages::task_starting(&agent.name, &title),
        );
        (agent, title, system, context)
    };
    ctx.persist_tasks().await;
    tracing::info!("Task {} started by {}", id, agent.name);

    let result = match ctx.registry.get(id) {
        Some(handler) => {
            handler(TaskInput {
                ctx: ctx.clone(),
                task_id: id,
                agent: agent.clone(),
                system,
                context,
            })
            .await
        }
        None => Err(anyhow::anyhow!("No handler registered for task {}", id)),
    };

    let outcome = {
        let mut state = ctx.state.lock().await;
        let Some(task) = state.task_mut(id) else {
            return TaskOutcome::Skipped;
        };
        match result {
            Ok(TaskResult::Done(text)) => {
                task.complete(text);
                state.say(MessageSource::Ai, Some(&agent.name), messages::task_complete(&title));
                TaskOutcome::Completed
            }
            Ok(TaskResult::Cancelled) => {
                task.reset();
                TaskOutcome::Cancelled
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Task {} failed: {:#}", id, e);
                task.fail(message.clone());
                state.say(MessageSource::Ai, Some(&agent.name), messages::task_failed(&title, &message));
                TaskOutcome::Failed
            }
        }
    };
    ctx.persist_tasks().await;
    outcome
}

fn string_lists(keys: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = keys
        .iter()
        .map(|k| (k.to_string(), json!({"type": "ARRAY", "items": {"type": "STRING"}})))
        .collect();
    json!({"type": "OBJECT", "properties": properties})
}

fn code_review_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "issues": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "severity": {"type": "STRING", "enum": ["CRITICAL", "MAJOR", "MINOR"]},
                        "category": {"type": "STRING", "enum": ["Bug", "Performance", "Style"]},
                        "description": {"type": "STRING"}
                    }
                }
            }
        }
    })
}

async fn json_task(input: &TaskInput, prompt: String, schema: Value, temperature: f32) -> Result<String> {
    let value = input
        .ctx
        .llm
        .complete_json(&prompt, &input.system, schema, temperature)
        .await?;
    Ok(serde_json::to_string_pretty(&value)?)
}

async fn text_task(input: &TaskInput, prompt: String) -> Result<String> {
    Ok(input.ctx.llm.complete(&prompt, &input.system, 0.4).await?)
}

async fn req_spec(input: TaskInput) -> Result<TaskResult> {
    let schema = string_lists(&["functional_requirements", "non_functional_requirements", "error_handling"]);
    let text = json_task(&input, prompts::requirements(), schema, 0.2).await?;
    Ok(TaskResult::Done(text))
}

async fn sys_design(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::system_design(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn res_proc(input: TaskInput) -> Result<TaskResult> {
    let schema = string_lists(&["hardware", "software", "personnel"]);
    let prompt = prompts::resource_plan(&input.context);
    Ok(TaskResult::Done(json_task(&input, prompt, schema, 0.2).await?))
}

async fn proto_spec(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::prototype_spec(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn mod_plan(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::module_plan(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn test_plan(input: TaskInput) -> Result<TaskResult> {
    let schema = string_lists(&["unit_tests", "integration_tests", "performance_tests", "security_audits"]);
    let prompt = prompts::test_plan(&input.context);
    Ok(TaskResult::Done(json_task(&input, prompt, schema, 0.2).await?))
}

async fn code_review(input: TaskInput) -> Result<TaskResult> {
    let findings = json_task(&input, prompts::code_review(), code_review_schema(), 0.1).await?;
    Ok(TaskResult::Done(prompts::code_review_report(&findings)))
}

async fn rollout_plan(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::rollout_plan(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn monitor_plan(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::monitoring_strategy(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn docs_plan(input: TaskInput) -> Result<TaskResult> {
    let prompt = prompts::docs_framework(&input.context);
    Ok(TaskResult::Done(text_task(&input, prompt).await?))
}

async fn create_container(input: TaskInput) -> Result<TaskResult> {
    let answer = input
        .ctx
        .prompter
        .ask(messages::CONTAINER_PROMPT, messages::CONTAINER_DEFAULT)
        .await;
    let Some(name) = answer.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) else {
        input.ctx.system(messages::CONTAINER_CANCELLED).await;
        return Ok(TaskResult::Cancelled);
    };
    let created = input.ctx.openai.create_container(&name).await?;
    Ok(TaskResult::Done(created))
}

const COLLAB_FILE: &str = "/docs/blog-real-time-collab.md";

async fn blog_post_collab(input: TaskInput) -> Result<TaskResult> {
    let ctx = &input.ctx;
    ctx.orchestrator(messages::collab_orchestrating(prompts::COLLAB_FEATURE)).await;
    let post = workflows::feature_pipeline(ctx, prompts::COLLAB_FEATURE, &COLLAB_NARRATION).await?;
    ctx.fs
        .write(COLLAB_FILE, &post)
        .await
        .with_context(|| format!("Failed to write {}", COLLAB_FILE))?;
    ctx.system(messages::blog_saved(COLLAB_FILE)).await;
    Ok(TaskResult::Done(post))
}
