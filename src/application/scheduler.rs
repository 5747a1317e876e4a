//! # Scheduler
//!
//! Fixed-interval loop that promotes due scheduled commands. Each due command
//! runs on its own tokio task through the router; the tick never waits for
//! them, so commands that come due together interleave on the shared state.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::application::router::{CommandOutcome, CommandRouter};
use crate::application::state::AppContext;
use crate::domain::types::ScheduleStatus;

/// Marks every due PENDING command as EXECUTING (in insertion order) and
/// spawns its execution. Returns the handles of the spawned runs.
pub async fn tick(ctx: &AppContext, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
    let due: Vec<(String, String)> = {
        let mut state = ctx.state.lock().await;
        state
            .scheduled
            .iter_mut()
            .filter(|cmd| cmd.is_due(now))
            .filter_map(|cmd| match cmd.transition(ScheduleStatus::Executing) {
                Ok(()) => Some((cmd.id.clone(), cmd.command.clone())),
                Err(e) => {
                    tracing::error!("Scheduler could not start {}: {}", cmd.id, e);
                    None
                }
            })
            .collect()
    };
    if due.is_empty() {
        return Vec::new();
    }
    ctx.persist_scheduled().await;

    due.into_iter()
        .map(|(id, command)| {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                tracing::info!("Running scheduled command {}: {}", id, command);
                let router = CommandRouter::new(ctx.clone());
                let settled = match router.route(&command, true).await {
                    Ok(CommandOutcome::Succeeded) => ScheduleStatus::Complete,
                    Ok(CommandOutcome::Failed) => ScheduleStatus::Failed,
                    Err(e) => {
                        tracing::error!("Scheduled command {} errored: {:#}", id, e);
                        ScheduleStatus::Failed
                    }
                };
                settle(&ctx, &id, settled).await;
            })
        })
        .collect()
}

async fn settle(ctx: &AppContext, id: &str, to: ScheduleStatus) {
    {
        let mut state = ctx.state.lock().await;
        match state.scheduled.iter_mut().find(|c| c.id == id) {
            Some(cmd) => {
                if let Err(e) = cmd.transition(to) {
                    tracing::error!("Scheduler could not settle {}: {}", id, e);
                }
            }
            None => tracing::warn!("Scheduled command {} vanished before settling", id),
        }
    }
    tracing::info!("Scheduled command {} settled as {}", id, to.as_str());
    ctx.persist_scheduled().await;
}

/// Starts the background tick loop.
pub fn spawn(ctx: AppContext) -> JoinHandle<()> {
    let period = Duration::from_millis(ctx.config.system.scheduler_tick_ms.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let _ = tick(&ctx, Utc::now()).await;
        }
    })
}
