//! # Help Command
//!
//! Handles the `/help` command.
//! Displays the main help menu to the user.

use anyhow::Result;

use crate::application::router::CommandOutcome;
use crate::application::state::AppContext;

pub async fn handle_help(ctx: &AppContext) -> Result<CommandOutcome> {
    ctx.system(crate::strings::help::MAIN).await;
    Ok(CommandOutcome::Succeeded)
}
