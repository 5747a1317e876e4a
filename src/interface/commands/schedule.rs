//! # Schedule Commands
//!
//! `/schedule "<cmd>" at <time>`, `/schedules` and `/cancel <id>`.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::domain::error::ScheduleError;
use crate::domain::types::{ScheduleStatus, ScheduledCommand};
use crate::strings::messages;

static SCHEDULE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn schedule_re() -> Option<&'static Regex> {
    SCHEDULE_RE
        .get_or_init(|| Regex::new(r#""([^"]+)" at (.+)"#).ok())
        .as_ref()
}

#[derive(Debug, PartialEq)]
pub enum ScheduleParse {
    Ok { command: String, at: DateTime<Utc> },
    BadFormat,
    BadDate(String),
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS[.fff]]` in local time.
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .map(|local| local.with_timezone(&Utc))
}

pub fn parse_schedule(args: &str) -> ScheduleParse {
    let Some(caps) = schedule_re().and_then(|re| re.captures(args)) else {
        return ScheduleParse::BadFormat;
    };
    let command = caps[1].to_string();
    let time = caps[2].trim().to_string();
    match parse_time(&time) {
        Some(at) => ScheduleParse::Ok { command, at },
        None => ScheduleParse::BadDate(time),
    }
}

fn local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub async fn handle_schedule(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let (command, at) = match parse_schedule(&args.rest) {
        ScheduleParse::Ok { command, at } => (command, at),
        ScheduleParse::BadFormat => {
            ctx.system(messages::SCHEDULE_FORMAT).await;
            return Ok(CommandOutcome::Failed);
        }
        ScheduleParse::BadDate(value) => {
            ctx.system(messages::invalid_date(&value)).await;
            return Ok(CommandOutcome::Failed);
        }
    };

    let scheduled = ScheduledCommand::new(command, at);
    let id = scheduled.id.clone();
    tracing::info!("Scheduled '{}' for {} ({})", scheduled.command, at, id);
    ctx.state.lock().await.scheduled.push(scheduled);
    ctx.persist_scheduled().await;
    ctx.system(messages::command_scheduled(&id, &local(at))).await;
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_schedules(ctx: &AppContext) -> Result<CommandOutcome> {
    let lines = {
        let state = ctx.state.lock().await;
        state
            .scheduled
            .iter()
            .map(|c| format!("{}  [{:<9}]  {}  {}", c.id, c.status().as_str(), local(c.execute_at()), c.command))
            .collect::<Vec<_>>()
    };
    if lines.is_empty() {
        ctx.system(messages::NO_SCHEDULED).await;
    } else {
        ctx.system(messages::scheduled_list(&lines.join("\n"))).await;
    }
    Ok(CommandOutcome::Succeeded)
}

pub async fn handle_cancel(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let Some(id) = args.first() else {
        ctx.system(messages::CANCEL_USAGE).await;
        return Ok(CommandOutcome::Failed);
    };

    let result = {
        let mut state = ctx.state.lock().await;
        match state.scheduled.iter_mut().find(|c| c.id == id) {
            Some(cmd) => cmd.transition(ScheduleStatus::Cancelled),
            None => Err(ScheduleError::NotFound(id.to_string())),
        }
    };
    match result {
        Ok(()) => {
            ctx.persist_scheduled().await;
            ctx.system(messages::command_cancelled(id)).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(e) => {
            ctx.system(messages::cancel_failed(&e.to_string())).await;
            Ok(CommandOutcome::Failed)
        }
    }
}
