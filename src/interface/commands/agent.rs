//! # Agent Commands
//!
//! `/agent [list|<name>]` shows or switches the active agent; `/note` appends
//! to an agent's strategic notes.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::strings::messages;

pub async fn handle_agent(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let reply = {
        let mut state = ctx.state.lock().await;
        match args.first() {
            Some("list") => {
                let lines = state
                    .agents
                    .iter()
                    .map(|a| format!("- {} ({})", a.name, a.role))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(messages::agent_list(&lines))
            }
            Some(name) => match state.agent(name).map(|a| a.name.clone()) {
                Some(found) => {
                    state.active_agent = found.clone();
                    Ok(messages::agent_switched(&found))
                }
                None => Err(messages::agent_not_found(name)),
            },
            None => Ok(messages::current_agent(&state.active_agent)),
        }
    };

    match reply {
        Ok(text) => {
            ctx.system(text).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(text) => {
            ctx.system(text).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

pub async fn handle_note(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let (Some(name), note) = (args.first(), args.tail()) else {
        ctx.system(messages::NOTE_USAGE).await;
        return Ok(CommandOutcome::Failed);
    };
    if note.is_empty() {
        ctx.system(messages::NOTE_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }

    let added = {
        let mut state = ctx.state.lock().await;
        state.agent_mut(name).map(|agent| {
            agent.strategic_notes.push(note.clone());
            agent.name.clone()
        })
    };
    match added {
        Some(agent) => {
            tracing::info!("Strategic note added for {}", agent);
            ctx.persist_agents().await;
            ctx.system(messages::note_added(&agent)).await;
            Ok(CommandOutcome::Succeeded)
        }
        None => {
            ctx.system(messages::agent_not_found(name)).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};

    #[tokio::test]
    async fn test_agent_list_and_current() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        handle_agent(&ctx, &CommandArgs::new("")).await.unwrap();
        handle_agent(&ctx, &CommandArgs::new("list")).await.unwrap();
        let log = transcript(&ctx).await;
        assert_eq!(log[0], "Current agent: Andoy");
        assert!(log[1].starts_with("AVAILABLE AGENTS:\n- Andoy ("));
        assert_eq!(log[1].lines().count(), 11);
    }

    #[tokio::test]
    async fn test_agent_lookup_is_case_insensitive() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        let outcome = handle_agent(&ctx, &CommandArgs::new("lyra")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Succeeded);
        assert_eq!(ctx.state.lock().await.active_agent, "Lyra");
        assert_eq!(transcript(&ctx).await[0], "Active agent is now Lyra.");
    }

    #[tokio::test]
    async fn test_note_appends_and_feeds_task_prompt() {
        let llm = ScriptedGateway::new(vec!["ok"]);
        let ctx = test_context(llm.clone());
        handle_note(&ctx, &CommandArgs::new("Adam prefers OpenAPI 3.1")).await.unwrap();
        handle_note(&ctx, &CommandArgs::new("Adam")).await.unwrap();
        {
            let state = ctx.state.lock().await;
            assert_eq!(state.agent("Adam").unwrap().strategic_notes, vec!["prefers OpenAPI 3.1"]);
        }
        let log = transcript(&ctx).await;
        assert_eq!(log, vec!["Added strategic note for Adam.", messages::NOTE_USAGE]);
        assert_eq!(
            handle_note(&ctx, &CommandArgs::new("Ghost hi")).await.unwrap(),
            CommandOutcome::Failed
        );
    }
}
