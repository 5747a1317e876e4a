//! # Orchestration Commands
//!
//! `/orchestrate <goal>` has Andoy plan and run catalog tasks; `/innovate <desc>`
//! plans and runs a content-generation and file-writing sequence.

use anyhow::Result;

use crate::application::executor::{execute_file_plan, execute_task_plan};
use crate::application::planner::{generate_file_creation_plan, generate_plan};
use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::domain::plan::validate_file_plan;
use crate::domain::roster::ORCHESTRATOR;
use crate::strings::messages;

/// Orchestrator directives, if the user set any.
fn directives(instruction: &str) -> Option<String> {
    let trimmed = instruction.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub async fn handle_orchestrate(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let goal = args.rest.trim_matches('"').trim();
    if goal.is_empty() {
        ctx.system(messages::GOAL_REQUIRED).await;
        return Ok(CommandOutcome::Failed);
    }

    let (tasks, agents, custom) = {
        let mut state = ctx.state.lock().await;
        state.active_agent = ORCHESTRATOR.to_string();
        (
            state.tasks.clone(),
            state.agents.clone(),
            directives(&state.orchestrator_instruction),
        )
    };
    ctx.orchestrator(messages::orchestrate_start(goal)).await;

    let plan = match generate_plan(ctx.llm.as_ref(), goal, &tasks, &agents, custom.as_deref()).await {
        Ok(plan) => plan,
        Err(e) => {
            ctx.system(messages::orchestration_failed(&e.to_string())).await;
            return Ok(CommandOutcome::Failed);
        }
    };

    let plan_json = serde_json::to_string_pretty(&plan)?;
    ctx.orchestrator(messages::plan_received(plan.len(), &plan_json)).await;
    let report = execute_task_plan(ctx, &plan).await;
    ctx.orchestrator(messages::ORCHESTRATION_COMPLETE).await;
    Ok(CommandOutcome::from_ok(report.failed == 0))
}

pub async fn handle_innovate(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let description = args.rest.trim_matches('"').trim();
    if description.is_empty() {
        ctx.system(messages::DESCRIPTION_REQUIRED).await;
        return Ok(CommandOutcome::Failed);
    }

    let (agents, custom) = {
        let state = ctx.state.lock().await;
        (state.agents.clone(), directives(&state.orchestrator_instruction))
    };
    ctx.orchestrator(messages::innovate_start(description)).await;

    let plan = match generate_file_creation_plan(ctx.llm.as_ref(), description, &agents, custom.as_deref()).await {
        Ok(plan) => plan,
        Err(e) => {
            ctx.system(messages::innovation_failed(&e.to_string())).await;
            return Ok(CommandOutcome::Failed);
        }
    };
    let plan_json = serde_json::to_string_pretty(&plan)?;
    ctx.orchestrator(messages::plan_received(plan.len(), &plan_json)).await;

    if let Err(e) = validate_file_plan(&plan, &agents) {
        tracing::warn!("Rejected file creation plan: {}", e);
        ctx.system(messages::innovation_failed(&e.to_string())).await;
        return Ok(CommandOutcome::Failed);
    }

    match execute_file_plan(ctx, &plan).await {
        Ok(report) => {
            tracing::info!("File plan wrote {} file(s)", report.files_written.len());
            ctx.orchestrator(messages::FILE_PLAN_COMPLETE).await;
            Ok(CommandOutcome::Succeeded)
        }
        // The executor already reported the halt.
        Err(_) => Ok(CommandOutcome::Failed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};
    use crate::domain::catalog::TaskId;
    use crate::domain::types::TaskStatus;

    #[tokio::test]
    async fn test_orchestrate_runs_plan_in_order() {
        let llm = ScriptedGateway::new(vec![
            r#"{"plan":[
                {"taskId":"sys_design","agentName":"Adam","justification":"Architect it."},
                {"taskId":"rollout_plan","agentName":"Kara","justification":"Ship it."}
            ]}"#,
            "design",
            "rollout",
        ]);
        let ctx = test_context(llm.clone());
        ctx.state.lock().await.orchestrator_instruction = "Be brief.".into();

        let outcome = handle_orchestrate(&ctx, &CommandArgs::new("\"Build auth\"")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Succeeded);

        let log = transcript(&ctx).await;
        assert_eq!(log[0], "Andoy is formulating a plan for: \"Build auth\"");
        assert!(log[1].starts_with("Plan received. Executing 2 steps..."));
        assert_eq!(log.last().unwrap(), messages::ORCHESTRATION_COMPLETE);
        let state = ctx.state.lock().await;
        assert_eq!(state.task(TaskId::RolloutPlan).unwrap().details(), Some("rollout"));
        assert_eq!(state.active_agent, "Kara");
    }

    #[tokio::test]
    async fn test_orchestrate_plan_failure_runs_nothing() {
        let llm = ScriptedGateway::new(vec!["{}"]);
        let ctx = test_context(llm.clone());
        let outcome = handle_orchestrate(&ctx, &CommandArgs::new("anything")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(llm.calls(), 1);
        assert_eq!(
            transcript(&ctx).await.last().unwrap(),
            "Orchestration failed: Failed to create execution plan. Orchestration module failure."
        );
        let state = ctx.state.lock().await;
        assert!(state.tasks.iter().all(|t| t.status() == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn test_innovate_writes_planned_file() {
        let llm = ScriptedGateway::new(vec![
            r#"[
                {"agentName":"Lyra","action":"GENERATE_CONTENT","justification":"Draft.","params":{"prompt":"Write a README"},"outputVar":"readme"},
                {"agentName":"Lyra","action":"WRITE_FILE","justification":"Save.","params":{"fileName":"/src/README.md","contentVar":"readme"}}
            ]"#,
            "# Project",
        ]);
        let ctx = test_context(llm);
        let outcome = handle_innovate(&ctx, &CommandArgs::new("A README")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Succeeded);
        assert_eq!(ctx.fs.read("/src/README.md").await.unwrap(), "# Project");
        assert_eq!(transcript(&ctx).await.last().unwrap(), messages::FILE_PLAN_COMPLETE);
    }

    #[tokio::test]
    async fn test_innovate_rejects_invalid_plan_before_running() {
        let llm = ScriptedGateway::new(vec![
            r#"[{"agentName":"Lyra","action":"WRITE_FILE","justification":"Save.","params":{"fileName":"/a.md","contentVar":"ghost"}}]"#,
        ]);
        let ctx = test_context(llm.clone());
        let outcome = handle_innovate(&ctx, &CommandArgs::new("docs")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Failed);
        assert!(ctx.fs.read("/a.md").await.is_err());
        assert!(transcript(&ctx).await.last().unwrap().starts_with("Innovation failed: Step 1"));
    }

    #[tokio::test]
    async fn test_missing_goal() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        handle_orchestrate(&ctx, &CommandArgs::new("")).await.unwrap();
        handle_innovate(&ctx, &CommandArgs::new("")).await.unwrap();
        assert_eq!(
            transcript(&ctx).await,
            vec![messages::GOAL_REQUIRED, messages::DESCRIPTION_REQUIRED]
        );
    }
}
