//! # Logbook Commands
//!
//! `/log`, `/history` and `/clear`.

use anyhow::Result;
use chrono::Local;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::domain::types::LogEntry;
use crate::strings::messages;

pub async fn handle_log(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    if args.rest.is_empty() {
        ctx.system(messages::LOG_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }

    let entry = LogEntry::new(args.rest.clone());
    if let Err(e) = ctx.store.add_log_entry(&entry).await {
        tracing::error!("Failed to append log entry: {:#}", e);
        ctx.system(messages::log_failed(&e.to_string())).await;
        return Ok(CommandOutcome::Failed);
    }
    ctx.state.lock().await.logbook.push(entry);
    ctx.system(messages::MESSAGE_LOGGED).await;
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_history(ctx: &AppContext) -> Result<CommandOutcome> {
    let history = {
        let state = ctx.state.lock().await;
        state
            .logbook
            .iter()
            .map(|l| {
                format!(
                    "[{}] {}",
                    l.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                    l.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    if history.is_empty() {
        ctx.system(messages::LOGBOOK_EMPTY).await;
    } else {
        ctx.system(history).await;
    }
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_clear(ctx: &AppContext) -> Result<CommandOutcome> {
    ctx.state.lock().await.console.clear();
    Ok(CommandOutcome::Succeeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};

    #[tokio::test]
    async fn test_log_persists_and_history_lists() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        handle_history(&ctx).await.unwrap();
        handle_log(&ctx, &CommandArgs::new("deployed v2")).await.unwrap();
        handle_history(&ctx).await.unwrap();

        let log = transcript(&ctx).await;
        assert_eq!(log[0], messages::LOGBOOK_EMPTY);
        assert_eq!(log[1], messages::MESSAGE_LOGGED);
        assert!(log[2].starts_with('[') && log[2].ends_with("] deployed v2"));
        assert_eq!(ctx.store.get_logbook().await.unwrap()[0].content, "deployed v2");
    }

    #[tokio::test]
    async fn test_empty_log_is_rejected() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        assert_eq!(handle_log(&ctx, &CommandArgs::new("  ")).await.unwrap(), CommandOutcome::Failed);
        assert!(ctx.state.lock().await.logbook.is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_console() {
        let ctx = test_context(ScriptedGateway::new(vec![]));
        ctx.system("noise").await;
        handle_clear(&ctx).await.unwrap();
        assert!(transcript(&ctx).await.is_empty());
    }
}
