//! # Task Commands
//!
//! `/tasks` prints the catalog; `/exec <task_id>` runs one task with the
//! active agent.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::application::tasks::{TaskOutcome, invoke_task};
use crate::domain::catalog::TaskId;
use crate::strings::messages;

pub async fn handle_tasks(ctx: &AppContext) -> Result<CommandOutcome> {
    let listing = {
        let state = ctx.state.lock().await;
        state
            .tasks
            .iter()
            .map(|t| format!("[{:<9}] {:<18} - {}", t.status().as_str(), t.id.as_str(), t.title))
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.system(messages::task_status(&listing)).await;
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_exec(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let Some(task_id) = args.first() else {
        ctx.system(messages::TASK_ID_REQUIRED).await;
        return Ok(CommandOutcome::Failed);
    };
    if TaskId::from_str(task_id).is_none() {
        ctx.system(messages::unknown_task(task_id)).await;
        return Ok(CommandOutcome::Failed);
    }

    let outcome = invoke_task(ctx, task_id, None).await;
    Ok(CommandOutcome::from_ok(outcome == TaskOutcome::Completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};
    use crate::domain::types::TaskStatus;

    #[tokio::test]
    async fn test_exec_requires_known_id() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        assert_eq!(handle_exec(&ctx, &CommandArgs::new("")).await.unwrap(), CommandOutcome::Failed);
        assert_eq!(
            handle_exec(&ctx, &CommandArgs::new("launch_rocket")).await.unwrap(),
            CommandOutcome::Failed
        );
        assert_eq!(
            transcript(&ctx).await,
            vec![messages::TASK_ID_REQUIRED.to_string(), messages::unknown_task("launch_rocket")]
        );
    }

    #[tokio::test]
    async fn test_exec_runs_with_active_agent() {
        let ctx = test_context(ScriptedGateway::new(vec!["rollout"]));
        ctx.state.lock().await.active_agent = "Kara".into();
        let outcome = handle_exec(&ctx, &CommandArgs::new("rollout_plan")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Succeeded);
        let state = ctx.state.lock().await;
        assert_eq!(state.task(TaskId::RolloutPlan).unwrap().status(), TaskStatus::Complete);
        assert_eq!(state.console.messages()[0].agent_name.as_deref(), Some("Kara"));
    }
}
