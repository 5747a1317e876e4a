//! # Virtual Filesystem
//!
//! Two backends behind [`VirtualFs`]: a disk sandbox rooted at the workspace
//! directory and an in-memory tree used when the sandbox cannot be prepared.
//! Both address files by absolute virtual paths and are seeded with the same
//! starter documents.

pub mod disk;
pub mod memory;

use std::path::Path;
use std::sync::Arc;

use crate::domain::config::{FsMode, SystemConfig, expand_path};
use crate::domain::error::FsError;
use crate::domain::traits::VirtualFs;

pub use disk::DiskFs;
pub use memory::MemoryFs;

const CONTAINERS_API_DOCS: &str = include_str!("../../../assets/openai-containers-api.md");

/// Starter documents written on first boot.
pub fn seed_files(mock: bool) -> Vec<(&'static str, &'static str)> {
    let readme = if mock {
        "# CASSA VEGAS Command Console\nWelcome to the file system (mock mode)."
    } else {
        "# CASSA VEGAS Command Console\nWelcome to the file system."
    };
    vec![
        ("/README.md", readme),
        (
            "/docs/getting-started.md",
            "## Getting Started\nUse the commands to navigate and manage files.",
        ),
        (
            "/docs/guides/advanced-usage.md",
            "## Advanced Usage\nExplore agent orchestration.",
        ),
        ("/docs/openai-containers-api.md", CONTAINERS_API_DOCS),
    ]
}

/// Splits a virtual path into normalized components. `.` is dropped and `..`
/// pops; climbing above the root is rejected. Relative paths start at the root.
pub fn components(path: &str) -> Result<Vec<String>, FsError> {
    let mut parts: Vec<String> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(FsError::AccessDenied(path.to_string()));
                }
            }
            other => parts.push(other.to_string()),
        }
    }
    Ok(parts)
}

/// Canonical `/a/b` form of a component list.
pub fn join_virtual(parts: &[String]) -> String {
    format!("/{}", parts.join("/"))
}

/// Boots the configured backend. `Auto` and `Disk` try the sandbox first and
/// fall back to memory on failure.
pub async fn boot(system: &SystemConfig, force_memory: bool) -> Arc<dyn VirtualFs> {
    if force_memory || system.filesystem == FsMode::Memory {
        tracing::info!("Virtual filesystem: memory");
        return Arc::new(MemoryFs::seeded());
    }

    let root = expand_path(&system.workspace_dir);
    match prepare_disk(&root).await {
        Ok(fs) => {
            tracing::info!("Virtual filesystem: disk sandbox at {}", fs.root().display());
            Arc::new(fs)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to prepare workspace {:?}, falling back to mock file system: {}",
                root,
                e
            );
            Arc::new(MemoryFs::seeded())
        }
    }
}

async fn prepare_disk(root: &Path) -> Result<DiskFs, FsError> {
    let fresh = !root.exists();
    tokio::fs::create_dir_all(root).await?;
    let fs = DiskFs::new(root)?;
    if fresh {
        for (path, content) in seed_files(false) {
            fs.write(path, content).await?;
        }
    }
    Ok(fs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_normalize() {
        assert_eq!(components("/docs/./a.md").unwrap(), vec!["docs", "a.md"]);
        assert_eq!(components("docs//guides/../a.md").unwrap(), vec!["docs", "a.md"]);
        assert!(components(".").unwrap().is_empty());
        assert!(components("/").unwrap().is_empty());
    }

    #[test]
    fn test_components_reject_escape() {
        assert!(matches!(components("/../etc/passwd"), Err(FsError::AccessDenied(_))));
        assert!(matches!(components("a/../../b"), Err(FsError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_boot_memory_mode() {
        let system = SystemConfig {
            filesystem: FsMode::Memory,
            ..Default::default()
        };
        let fs = boot(&system, false).await;
        assert!(fs.is_mock());
        assert!(fs.read("/docs/openai-containers-api.md").await.unwrap().contains("Containers API"));
    }

    #[tokio::test]
    async fn test_boot_disk_seeds_fresh_workspace() {
        let tmp = tempfile::tempdir().unwrap();
        let system = SystemConfig {
            workspace_dir: tmp.path().join("ws").to_string_lossy().to_string(),
            ..Default::default()
        };
        let fs = boot(&system, false).await;
        assert!(!fs.is_mock());
        assert_eq!(
            fs.read("/docs/guides/advanced-usage.md").await.unwrap(),
            "## Advanced Usage\nExplore agent orchestration."
        );
    }
}
