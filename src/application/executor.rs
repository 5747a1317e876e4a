//! # Plan Executor
//!
//! Sequential interpreter for both plan dialects. Task plans keep going past
//! bad steps; file plans stop at the first failure.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::application::state::AppContext;
use crate::application::tasks::{TaskOutcome, invoke_task};
use crate::domain::error::{FsError, ProviderError};
use crate::domain::plan::{ExecutionStep, FileAction, FileCreationStep};
use crate::strings::messages;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Agent \"{0}\" not found.")]
    UnknownAgent(String),
    #[error("Content variable \"{0}\" not found or is not text.")]
    MissingVariable(String),
    #[error("Unknown action type \"{0}\".")]
    UnknownAction(String),
    #[error("{action} step is missing '{field}'.")]
    MissingParam { action: &'static str, field: &'static str },
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Fs(#[from] FsError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlanReport {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FileRunReport {
    pub steps_run: usize,
    pub files_written: Vec<String>,
}

pub async fn execute_task_plan(ctx: &AppContext, plan: &[ExecutionStep]) -> PlanReport {
    let mut report = PlanReport::default();

    for step in plan {
        let agent_name = {
            let mut state = ctx.state.lock().await;
            match state.agent(&step.agent_name).map(|a| a.name.clone()) {
                Some(name) => {
                    state.active_agent = name.clone();
                    Some(name)
                }
                None => None,
            }
        };
        let Some(agent_name) = agent_name else {
            tracing::warn!("Plan step skipped: agent '{}' not found", step.agent_name);
            ctx.system(messages::step_skipped(&step.agent_name, &step.task_id)).await;
            report.skipped += 1;
            continue;
        };

        ctx.orchestrator(messages::step_handoff(&agent_name, &step.justification))
            .await;

        match invoke_task(ctx, &step.task_id, Some(&agent_name)).await {
            TaskOutcome::Completed => report.completed += 1,
            TaskOutcome::Failed => report.failed += 1,
            TaskOutcome::Cancelled | TaskOutcome::Skipped => report.skipped += 1,
        }
    }

    tracing::info!(
        "Task plan finished: {} completed, {} failed, {} skipped",
        report.completed,
        report.failed,
        report.skipped
    );
    report
}

/// Runs a file plan. The first failing step emits `Execution failed: ..` and
/// ends the run; steps already done are not undone.
pub async fn execute_file_plan(ctx: &AppContext, plan: &[FileCreationStep]) -> Result<FileRunReport, ExecutionError> {
    match run_file_plan(ctx, plan).await {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::error!("File plan halted: {}", e);
            ctx.system(messages::execution_failed(&e.to_string())).await;
            Err(e)
        }
    }
}

async fn run_file_plan(ctx: &AppContext, plan: &[FileCreationStep]) -> Result<FileRunReport, ExecutionError> {
    let mut scope: HashMap<String, String> = HashMap::new();
    let mut report = FileRunReport::default();
    let delay = Duration::from_millis(ctx.config.system.step_delay_ms);

    for step in plan {
        let (agent_name, system) = ctx
            .persona(&step.agent_name)
            .await
            .map_err(|_| ExecutionError::UnknownAgent(step.agent_name.clone()))?;

        ctx.orchestrator(messages::file_step(&agent_name, &step.justification))
            .await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match &step.action {
            FileAction::GenerateContent => {
                let prompt = step.params.prompt.as_deref().ok_or(ExecutionError::MissingParam {
                    action: "GENERATE_CONTENT",
                    field: "params.prompt",
                })?;
                let var = step.output_var.as_deref().ok_or(ExecutionError::MissingParam {
                    action: "GENERATE_CONTENT",
                    field: "outputVar",
                })?;
                let content = ctx.llm.complete(prompt, &system, 0.4).await?;
                scope.insert(var.to_string(), content);
                ctx.ai(&agent_name, messages::content_generated(var)).await;
            }
            FileAction::WriteFile => {
                let var = step.params.content_var.as_deref().unwrap_or_default();
                let content = scope
                    .get(var)
                    .ok_or_else(|| ExecutionError::MissingVariable(var.to_string()))?;
                let path = step.params.file_name.as_deref().ok_or(ExecutionError::MissingParam {
                    action: "WRITE_FILE",
                    field: "params.fileName",
                })?;
                ctx.fs.write(path, content).await?;
                ctx.ai(&agent_name, messages::wrote_file(path)).await;
                report.files_written.push(path.to_string());
            }
            FileAction::Unknown(raw) => return Err(ExecutionError::UnknownAction(raw.clone())),
        }
        report.steps_run += 1;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};
    use crate::domain::catalog::TaskId;
    use crate::domain::plan::FileStepParams;
    use crate::domain::types::TaskStatus;

    fn generate(agent: &str, var: &str) -> FileCreationStep {
        FileCreationStep {
            agent_name: agent.into(),
            action: FileAction::GenerateContent,
            justification: "draft".into(),
            params: FileStepParams {
                prompt: Some("Write a README".into()),
                ..Default::default()
            },
            output_var: Some(var.into()),
        }
    }

    fn write(var: &str, path: &str) -> FileCreationStep {
        FileCreationStep {
            agent_name: "Lyra".into(),
            action: FileAction::WriteFile,
            justification: "save".into(),
            params: FileStepParams {
                file_name: Some(path.into()),
                content_var: Some(var.into()),
                ..Default::default()
            },
            output_var: None,
        }
    }

    #[tokio::test]
    async fn test_file_plan_writes_generated_content() {
        let ctx = test_context(ScriptedGateway::new(vec!["# Hello"]));
        let report = execute_file_plan(&ctx, &[generate("Lyra", "x"), write("x", "/a.md")])
            .await
            .unwrap();
        assert_eq!(report.steps_run, 2);
        assert_eq!(report.files_written, vec!["/a.md"]);
        assert_eq!(ctx.fs.read("/a.md").await.unwrap(), "# Hello");
        let log = transcript(&ctx).await;
        assert_eq!(log[0], "Step for Lyra: draft");
        assert_eq!(log[1], "Content generated for \"x\".");
        assert_eq!(log[3], "Wrote content to file: /a.md");
    }

    #[tokio::test]
    async fn test_undefined_variable_stops_with_no_writes() {
        let ctx = test_context(ScriptedGateway::new(vec!["unused"]));
        let err = execute_file_plan(&ctx, &[write("missing", "/a.md"), generate("Lyra", "missing")])
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::MissingVariable(ref v) if v == "missing"));
        assert!(ctx.fs.read("/a.md").await.is_err());
        assert!(transcript(&ctx).await.contains(
            &"Execution failed: Content variable \"missing\" not found or is not text.".to_string()
        ));
    }

    #[tokio::test]
    async fn test_unknown_agent_and_action_halt() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        let err = execute_file_plan(&ctx, &[generate("Ghost", "x")]).await.unwrap_err();
        assert_eq!(err.to_string(), "Agent \"Ghost\" not found.");

        let mut odd = generate("Adam", "x");
        odd.action = FileAction::Unknown("DELETE_ALL".into());
        let err = execute_file_plan(&ctx, &[odd]).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown action type \"DELETE_ALL\".");
    }

    #[tokio::test]
    async fn test_provider_error_is_fatal_to_file_plan() {
        let ctx = test_context(ScriptedGateway::with_results(vec![Err(ProviderError::new("gemini", "down"))]));
        let err = execute_file_plan(&ctx, &[generate("Lyra", "x"), write("x", "/a.md")])
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Provider(_)));
        assert!(ctx.fs.read("/a.md").await.is_err());
    }

    #[tokio::test]
    async fn test_task_plan_skips_unknown_agents_and_continues() {
        let ctx = test_context(ScriptedGateway::new(vec!["design", "modules"]));
        let plan = vec![
            ExecutionStep {
                task_id: "sys_design".into(),
                agent_name: "Adam".into(),
                justification: "Architect.".into(),
            },
            ExecutionStep {
                task_id: "res_proc".into(),
                agent_name: "Nobody".into(),
                justification: "?".into(),
            },
            ExecutionStep {
                task_id: "mod_plan".into(),
                agent_name: "Stan".into(),
                justification: "Modules.".into(),
            },
        ];
        let report = execute_task_plan(&ctx, &plan).await;
        assert_eq!(
            report,
            PlanReport {
                completed: 2,
                failed: 0,
                skipped: 1
            }
        );
        let state = ctx.state.lock().await;
        assert_eq!(state.active_agent, "Stan");
        assert_eq!(state.task(TaskId::ResProc).unwrap().status(), TaskStatus::Pending);
        assert_eq!(state.task(TaskId::ModPlan).unwrap().details(), Some("modules"));
        drop(state);
        let log = transcript(&ctx).await;
        assert!(log.contains(&"Adam, you're up. Architect.".to_string()));
        assert!(log.contains(&"Agent \"Nobody\" not found; skipping task res_proc.".to_string()));
    }

    #[tokio::test]
    async fn test_task_plan_failures_do_not_abort() {
        let ctx = test_context(ScriptedGateway::with_results(vec![
            Err(ProviderError::new("gemini", "boom")),
            Ok("ok".into()),
        ]));
        let plan = vec![
            ExecutionStep {
                task_id: "proto_spec".into(),
                agent_name: "Adam".into(),
                justification: String::new(),
            },
            ExecutionStep {
                task_id: "docs_plan".into(),
                agent_name: "Lyra".into(),
                justification: String::new(),
            },
        ];
        let report = execute_task_plan(&ctx, &plan).await;
        assert_eq!((report.completed, report.failed), (1, 1));
    }
}
