//! # Command Router
//!
//! Routes console input to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `/exec req_spec`) and dispatches it with the
//! shared context. Every `Command` variant has exactly one arm in [`CommandRouter::route`].

use anyhow::Result;

use crate::application::state::AppContext;
use crate::interface::commands;
use crate::strings::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Tasks,
    Agent,
    Note,
    Log,
    History,
    Clear,
    Schedule,
    Schedules,
    Cancel,
    Exec,
    Orchestrate,
    Innovate,
    ResearchAndWrite,
    DevelopFeature,
    SpecFlow,
    Ask,
    Docs,
    Search,
    Cli,
    Key,
    Instructions,
    Ls,
    Cat,
    Touch,
    Mkdir,
    Rm,
    Edit,
    Tree,
    Zip,
    Unzip,
}

impl Command {
    pub fn parse(name: &str) -> Option<Self> {
        let command = match name {
            "/help" => Command::Help,
            "/tasks" => Command::Tasks,
            "/agent" => Command::Agent,
            "/note" => Command::Note,
            "/log" => Command::Log,
            "/history" => Command::History,
            "/clear" => Command::Clear,
            "/schedule" => Command::Schedule,
            "/schedules" => Command::Schedules,
            "/cancel" => Command::Cancel,
            "/exec" => Command::Exec,
            "/orchestrate" => Command::Orchestrate,
            "/innovate" => Command::Innovate,
            "/research_and_write" => Command::ResearchAndWrite,
            "/develop_feature" => Command::DevelopFeature,
            "/spec_flow" => Command::SpecFlow,
            "/ask" => Command::Ask,
            "/docs" => Command::Docs,
            "/search" => Command::Search,
            "/cli" => Command::Cli,
            "/key" => Command::Key,
            "/instructions" => Command::Instructions,
            "/ls" => Command::Ls,
            "/cat" => Command::Cat,
            "/touch" => Command::Touch,
            "/mkdir" => Command::Mkdir,
            "/rm" => Command::Rm,
            "/edit" => Command::Edit,
            "/tree" => Command::Tree,
            "/zip" => Command::Zip,
            "/unzip" => Command::Unzip,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded,
    Failed,
}

impl CommandOutcome {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            CommandOutcome::Succeeded
        } else {
            CommandOutcome::Failed
        }
    }
}

/// Arguments after the command name, as whitespace-split tokens and rejoined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub list: Vec<String>,
    pub rest: String,
}

impl CommandArgs {
    pub fn new(raw: &str) -> Self {
        let list: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        let rest = list.join(" ");
        Self { list, rest }
    }

    pub fn first(&self) -> Option<&str> {
        self.list.first().map(String::as_str)
    }

    /// Tokens after the first, rejoined with single spaces.
    pub fn tail(&self) -> String {
        self.list.iter().skip(1).cloned().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Clone)]
pub struct CommandRouter {
    ctx: AppContext,
}

impl CommandRouter {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub async fn route(&self, raw: &str, is_scheduled: bool) -> Result<CommandOutcome> {
        let ctx = &self.ctx;
        if is_scheduled {
            ctx.system(messages::running_scheduled(raw)).await;
        } else {
            ctx.user(raw).await;
        }

        let msg = raw.trim();
        let (cmd, rest) = match msg.find(char::is_whitespace) {
            Some(idx) => (&msg[..idx], &msg[idx + 1..]),
            None => (msg, ""),
        };
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' scheduled={}",
            cmd,
            rest,
            is_scheduled
        );

        let Some(command) = Command::parse(cmd) else {
            ctx.system(messages::unknown_command(cmd)).await;
            return Ok(CommandOutcome::Failed);
        };
        let args = CommandArgs::new(rest);

        match command {
            Command::Help => commands::help::handle_help(ctx).await,
            Command::Tasks => commands::tasks::handle_tasks(ctx).await,
            Command::Exec => commands::tasks::handle_exec(ctx, &args).await,
            Command::Agent => commands::agent::handle_agent(ctx, &args).await,
            Command::Note => commands::agent::handle_note(ctx, &args).await,
            Command::Log => commands::logbook::handle_log(ctx, &args).await,
            Command::History => commands::logbook::handle_history(ctx).await,
            Command::Clear => commands::logbook::handle_clear(ctx).await,
            Command::Schedule => commands::schedule::handle_schedule(ctx, &args).await,
            Command::Schedules => commands::schedule::handle_schedules(ctx).await,
            Command::Cancel => commands::schedule::handle_cancel(ctx, &args).await,
            Command::Orchestrate => commands::orchestrate::handle_orchestrate(ctx, &args).await,
            Command::Innovate => commands::orchestrate::handle_innovate(ctx, &args).await,
            Command::ResearchAndWrite => commands::workflow::handle_research_and_write(ctx, &args).await,
            Command::DevelopFeature => commands::workflow::handle_develop_feature(ctx, &args).await,
            Command::SpecFlow => commands::workflow::handle_spec_flow(ctx, &args).await,
            Command::Search => commands::workflow::handle_search(ctx, &args).await,
            Command::Ask => commands::query::handle_ask(ctx, &args).await,
            Command::Docs => commands::query::handle_docs(ctx, &args).await,
            Command::Cli => commands::query::handle_cli(ctx, &args).await,
            Command::Key => commands::settings::handle_key(ctx, &args).await,
            Command::Instructions => commands::settings::handle_instructions(ctx, &args).await,
            Command::Ls => commands::fs::handle_ls(ctx, &args).await,
            Command::Cat => commands::fs::handle_cat(ctx, &args).await,
            Command::Touch => commands::fs::handle_touch(ctx, &args).await,
            Command::Mkdir => commands::fs::handle_mkdir(ctx, &args).await,
            Command::Rm => commands::fs::handle_rm(ctx, &args).await,
            Command::Edit => commands::fs::handle_edit(ctx, &args).await,
            Command::Tree => commands::fs::handle_tree(ctx, &args).await,
            Command::Zip => commands::fs::handle_zip(ctx, &args).await,
            Command::Unzip => commands::fs::handle_unzip(ctx, &args).await,
        }
    }
}
