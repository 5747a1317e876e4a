//! # Settings Commands
//!
//! `/key` sets and validates the OpenAI key; `/instructions` shows or replaces
//! the orchestrator and supervisor instructions. Both persist to the settings store.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::strings::messages;

pub async fn handle_key(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let Some(key) = args.first() else {
        ctx.system(messages::provider_status(ctx.openai.status().as_str())).await;
        ctx.system(messages::KEY_USAGE).await;
        return Ok(CommandOutcome::Succeeded);
    };

    ctx.system(messages::KEY_VALIDATING).await;
    if !ctx.openai.initialize(key).await {
        tracing::warn!("OpenAI key rejected");
        ctx.system(messages::KEY_INVALID).await;
        return Ok(CommandOutcome::Failed);
    }

    ctx.state.lock().await.settings.openai_api_key = Some(key.to_string());
    ctx.persist_settings().await;
    ctx.system(messages::KEY_VALID).await;
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_instructions(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let text = args.tail();
    let text = text.trim_matches('"').trim().to_string();

    match (args.first(), text.is_empty()) {
        (None, _) => {
            let view = {
                let state = ctx.state.lock().await;
                messages::instructions_view(&state.orchestrator_instruction, &state.supervisor_instruction)
            };
            ctx.system(view).await;
            Ok(CommandOutcome::Succeeded)
        }
        (Some(target @ ("orchestrator" | "supervisor")), false) => {
            {
                let mut state = ctx.state.lock().await;
                if target == "orchestrator" {
                    state.orchestrator_instruction = text.clone();
                    state.settings.orchestrator_instruction = Some(text);
                } else {
                    state.supervisor_instruction = text.clone();
                    state.settings.supervisor_instruction = Some(text);
                }
            }
            tracing::info!("Updated {} instruction", target);
            ctx.persist_settings().await;
            ctx.system(messages::INSTRUCTIONS_SAVED).await;
            Ok(CommandOutcome::Succeeded)
        }
        _ => {
            ctx.system(messages::INSTRUCTIONS_USAGE).await;
            Ok(CommandOutcome::Failed)
        }
    }
}
