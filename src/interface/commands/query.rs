//! # Query Commands
//!
//! One-shot questions: `/ask` and `/docs` answer as the active agent, `/cli`
//! sends a raw prompt to one of the provider terminals.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::strings::{help, messages, prompts};

pub async fn handle_ask(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    if args.rest.is_empty() {
        ctx.system(messages::ASK_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }
    let (agent, system) = ctx.active_persona().await?;
    match ctx.llm.complete(&args.rest, &system, 0.5).await {
        Ok(answer) => {
            ctx.ai(&agent, answer).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(e) => {
            tracing::error!("ask failed: {}", e);
            ctx.system(messages::ASK_FAILED).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

pub async fn handle_docs(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let (Some(url), question) = (args.first(), args.tail()) else {
        ctx.system(messages::DOCS_USAGE).await;
        return Ok(CommandOutcome::Failed);
    };
    if question.is_empty() {
        ctx.system(messages::DOCS_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }

    let (agent, system) = ctx.active_persona().await?;
    match ctx.llm.complete(&prompts::api_docs(url, &question), &system, 0.2).await {
        Ok(answer) => {
            ctx.ai(&agent, answer).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(e) => {
            tracing::error!("docs query failed for {}: {}", url, e);
            ctx.system(messages::DOCS_FAILED).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

pub async fn handle_cli(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let prompt = args.tail();
    let (label, help_text) = match args.first() {
        Some("gemini") => ("Gemini", help::GEMINI_CLI),
        Some("openai") => ("OpenAI", help::OPENAI_CLI),
        _ => {
            ctx.system(messages::CLI_USAGE).await;
            return Ok(CommandOutcome::Failed);
        }
    };
    if prompt.is_empty() {
        ctx.system(messages::CLI_USAGE).await;
        return Ok(CommandOutcome::Failed);
    }
    if prompt == "help" {
        ctx.system(help_text).await;
        return Ok(CommandOutcome::Succeeded);
    }

    let result = match label {
        "Gemini" => ctx.llm.complete(&prompt, prompts::CLI_SYSTEM, 0.5).await,
        _ => ctx.openai.complete(&prompt).await,
    };
    match result {
        Ok(answer) => {
            ctx.ai(label, answer).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(e) => {
            ctx.system(messages::cli_failed(label, &e.to_string())).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ScriptedGateway, test_context, transcript};
    use crate::domain::error::ProviderError;

    #[tokio::test]
    async fn test_ask_answers_as_active_agent() {
        let llm = ScriptedGateway::new(vec!["42"]);
        let ctx = test_context(llm);
        ctx.state.lock().await.active_agent = "Sophia".into();
        handle_ask(&ctx, &CommandArgs::new("meaning of life?")).await.unwrap();
        let state = ctx.state.lock().await;
        let reply = state.console.messages().last().unwrap();
        assert_eq!(reply.content, "42");
        assert_eq!(reply.prefix(), "[SOPHIA] >>");
    }

    #[tokio::test]
    async fn test_ask_failure_message() {
        let ctx = test_context(ScriptedGateway::with_results(vec![Err(ProviderError::new("gemini", "x"))]));
        let outcome = handle_ask(&ctx, &CommandArgs::new("hi")).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(transcript(&ctx).await, vec![messages::ASK_FAILED]);
    }

    #[tokio::test]
    async fn test_docs_embeds_url_and_question() {
        let llm = ScriptedGateway::new(vec!["Use POST /containers"]);
        let ctx = test_context(llm.clone());
        handle_docs(&ctx, &CommandArgs::new("https://example.com/api how do I create one?"))
            .await
            .unwrap();
        let prompt = &llm.prompts().await[0];
        assert!(prompt.contains("https://example.com/api"));
        assert!(prompt.contains("how do I create one?"));
        assert_eq!(
            handle_docs(&ctx, &CommandArgs::new("https://example.com/api")).await.unwrap(),
            CommandOutcome::Failed
        );
    }

    #[tokio::test]
    async fn test_cli_routes_to_provider() {
        let llm = ScriptedGateway::new(vec!["fn main() {}"]);
        let ctx = test_context(llm.clone());
        handle_cli(&ctx, &CommandArgs::new("gemini write hello world")).await.unwrap();
        handle_cli(&ctx, &CommandArgs::new("openai say hi")).await.unwrap();
        handle_cli(&ctx, &CommandArgs::new("openai help")).await.unwrap();
        handle_cli(&ctx, &CommandArgs::new("claude hi")).await.unwrap();

        let log = transcript(&ctx).await;
        assert_eq!(log[0], "fn main() {}");
        assert_eq!(log[1], "openai: say hi");
        assert_eq!(log[2], help::OPENAI_CLI);
        assert_eq!(log[3], messages::CLI_USAGE);
        assert_eq!(llm.prompts().await, vec!["write hello world"]);
    }
}
