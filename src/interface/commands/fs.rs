//! # Filesystem Commands
//!
//! `/ls`, `/cat`, `/touch`, `/mkdir`, `/rm`, `/edit`, `/tree`, `/zip` and
//! `/unzip` against the virtual filesystem. Every failure, including a
//! missing argument, is reported as `FS Error: ..`.

use anyhow::Result;

use crate::application::router::{CommandArgs, CommandOutcome};
use crate::application::state::AppContext;
use crate::domain::types::{FileSystemNode, NodeKind};
use crate::strings::messages;

enum FsFailure {
    Usage(&'static str),
    Fs(crate::domain::error::FsError),
}

impl From<crate::domain::error::FsError> for FsFailure {
    fn from(e: crate::domain::error::FsError) -> Self {
        FsFailure::Fs(e)
    }
}

async fn finish(ctx: &AppContext, result: Result<String, FsFailure>) -> Result<CommandOutcome> {
    match result {
        Ok(output) => {
            ctx.system(output).await;
            Ok(CommandOutcome::Succeeded)
        }
        Err(FsFailure::Usage(text)) => {
            ctx.system(messages::fs_error(text)).await;
            Ok(CommandOutcome::Failed)
        }
        Err(FsFailure::Fs(e)) => {
            tracing::warn!("Filesystem command failed: {}", e);
            ctx.system(messages::fs_error(&e.to_string())).await;
            Ok(CommandOutcome::Failed)
        }
    }
}

fn required<'a>(args: &'a CommandArgs, usage: &'static str) -> Result<&'a str, FsFailure> {
    args.first().ok_or(FsFailure::Usage(usage))
}

pub async fn handle_ls(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let path = args.first().unwrap_or("/");
    let result = ctx.fs.list(path).await.map(|e| e.join("\n")).map_err(FsFailure::from);
    finish(ctx, result).await
}

pub async fn handle_cat(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::FILE_PATH_REQUIRED)?;
        Ok::<_, FsFailure>(ctx.fs.read(path).await?)
    }
    .await;
    finish(ctx, result).await
}

pub async fn handle_touch(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::FILE_NAME_REQUIRED)?;
        ctx.fs.write(path, "").await?;
        Ok::<_, FsFailure>(messages::file_created(path))
    }
    .await;
    finish(ctx, result).await
}

pub async fn handle_mkdir(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::DIRECTORY_NAME_REQUIRED)?;
        ctx.fs.mkdir(path).await?;
        Ok::<_, FsFailure>(messages::directory_created(path))
    }
    .await;
    finish(ctx, result).await
}

pub async fn handle_rm(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::PATH_REQUIRED)?;
        ctx.fs.remove(path).await?;
        Ok::<_, FsFailure>(messages::removed(path))
    }
    .await;
    finish(ctx, result).await
}

/// Strips one pair of surrounding double quotes.
fn unquote(content: &str) -> &str {
    let content = content.strip_prefix('"').unwrap_or(content);
    content.strip_suffix('"').unwrap_or(content)
}

pub async fn handle_edit(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::FILE_PATH_REQUIRED)?;
        let content = args.tail();
        ctx.fs.write(path, unquote(&content)).await?;
        Ok::<_, FsFailure>(messages::wrote_to(path))
    }
    .await;
    finish(ctx, result).await
}

fn render_tree(nodes: &[FileSystemNode], depth: usize, out: &mut Vec<String>) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node.kind {
            NodeKind::Directory => {
                out.push(format!("{}{}/", indent, node.name));
                render_tree(&node.children, depth + 1, out);
            }
            NodeKind::File => out.push(format!("{}{}", indent, node.name)),
        }
    }
}

pub async fn handle_tree(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let path = args.first().unwrap_or("/");
    let result = ctx
        .fs
        .tree(path)
        .await
        .map(|nodes| {
            let mut lines = vec![path.to_string()];
            render_tree(&nodes, 1, &mut lines);
            lines.join("\n")
        })
        .map_err(FsFailure::from);
    finish(ctx, result).await
}

pub async fn handle_zip(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let dir = required(args, messages::PATH_REQUIRED)?;
        let archive = ctx.fs.zip(dir).await?;
        Ok::<_, FsFailure>(messages::archived(dir, &archive))
    }
    .await;
    finish(ctx, result).await
}

pub async fn handle_unzip(ctx: &AppContext, args: &CommandArgs) -> Result<CommandOutcome> {
    let result = async {
        let path = required(args, messages::FILE_PATH_REQUIRED)?;
        ctx.fs.unzip(path).await?;
        Ok::<_, FsFailure>(messages::extracted(path))
    }
    .await;
    finish(ctx, result).await
}
