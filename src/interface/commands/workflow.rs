//! # Workflow Commands
//!
//! Thin wrappers around the multi-agent workflows. A failure anywhere in a
//! workflow becomes a single `<Workflow> workflow failed: ..` message.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::application::workflows;
use crate::strings::messages;

async fn report<T>(ctx: &AppContext, workflow: &str, result: Result<T>) -> CommandOutcome {
    match result {
        Ok(_) => CommandOutcome::Succeeded,
        Err(e) => {
            tracing::error!("{} workflow failed: {:#}", workflow, e);
            ctx.system(messages::workflow_failed(workflow, &e.to_string())).await;
            CommandOutcome::Failed
        }
    }
}

fn topic(args: &CommandArgs) -> &str {
    args.rest.trim_matches('"').trim()
}

pub async fn handle_research_and_write(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let topic = topic(args);
    let result = workflows::research_and_write(ctx, topic).await;
    Ok(report(ctx, "Research & Write", result).await)
}

pub async fn handle_develop_feature(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let description = topic(args);
    let result = workflows::develop_feature(ctx, description).await;
    Ok(report(ctx, "Develop Feature", result).await)
}

pub async fn handle_spec_flow(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let topic = topic(args);
    if topic.is_empty() {
        ctx.system(messages::SPEC_FLOW_TOPIC_REQUIRED).await;
        return Ok(CommandOutcome::Failed);
    }
    let result = workflows::spec_flow(ctx, topic).await;
    Ok(report(ctx, "Specification Handoff", result).await)
}

pub async fn handle_search(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    if args.rest.is_empty() {
        ctx.system(messages::SEARCH_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }
    match workflows::semantic_search(ctx, &args.rest).await {
        Ok(Some(_)) => Ok(CommandOutcome::Succeeded),
        Ok(None) => Ok(CommandOutcome::Failed),
        Err(e) => Ok(report::<()>(ctx, "Search", Err(e)).await),
    }
}
