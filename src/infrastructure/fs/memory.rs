//! In-memory filesystem used when no disk sandbox is available.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{components, join_virtual, seed_files};
use crate::domain::error::FsError;
use crate::domain::traits::VirtualFs;
use crate::domain::types::{FileSystemNode, NodeKind};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir(BTreeMap<String, Node>),
}

#[derive(Debug)]
pub struct MemoryFs {
    root: Mutex<BTreeMap<String, Node>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(BTreeMap::new()),
        }
    }

    /// Empty tree populated with the starter documents.
    pub fn seeded() -> Self {
        let fs = Self::new();
        for (path, content) in seed_files(true) {
            if let Err(e) = fs.write_sync(path, content) {
                tracing::error!("Failed to seed {}: {}", path, e);
            }
        }
        fs
    }

    fn with_root<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Node>) -> Result<T, FsError>,
    ) -> Result<T, FsError> {
        let mut guard = self
            .root
            .lock()
            .map_err(|_| FsError::Io(std::io::Error::other("filesystem lock poisoned")))?;
        f(&mut guard)
    }

    fn write_sync(&self, path: &str, content: &str) -> Result<(), FsError> {
        let parts = components(path)?;
        let Some((name, parents)) = parts.split_last() else {
            return Err(FsError::Root);
        };
        self.with_root(|root| {
            let dir = descend(root, parents, true)?;
            if let Some(Node::Dir(_)) = dir.get(name) {
                return Err(FsError::NotAFile(path.to_string()));
            }
            dir.insert(name.clone(), Node::File(content.to_string()));
            Ok(())
        })
    }
}

/// Walks to the directory named by `parts`, optionally creating missing levels.
fn descend<'a>(
    mut dir: &'a mut BTreeMap<String, Node>,
    parts: &[String],
    create: bool,
) -> Result<&'a mut BTreeMap<String, Node>, FsError> {
    for part in parts {
        if !dir.contains_key(part) {
            if !create {
                return Err(FsError::MissingParent(part.clone()));
            }
            dir.insert(part.clone(), Node::Dir(BTreeMap::new()));
        }
        dir = match dir.get_mut(part) {
            Some(Node::Dir(children)) => children,
            _ => return Err(FsError::NotADirectory(part.clone())),
        };
    }
    Ok(dir)
}

fn lookup<'a>(root: &'a BTreeMap<String, Node>, parts: &[String]) -> Option<NodeRef<'a>> {
    let mut dir = root;
    let Some((last, parents)) = parts.split_last() else {
        return Some(NodeRef::Dir(root));
    };
    for part in parents {
        match dir.get(part) {
            Some(Node::Dir(children)) => dir = children,
            _ => return None,
        }
    }
    match dir.get(last)? {
        Node::File(content) => Some(NodeRef::File(content)),
        Node::Dir(children) => Some(NodeRef::Dir(children)),
    }
}

enum NodeRef<'a> {
    File(&'a String),
    Dir(&'a BTreeMap<String, Node>),
}

/// Directories first, then files, each alphabetical.
fn build_tree(dir: &BTreeMap<String, Node>, base: &str) -> Vec<FileSystemNode> {
    let mut nodes: Vec<FileSystemNode> = dir
        .iter()
        .map(|(name, node)| {
            let path = if base == "/" {
                format!("/{}", name)
            } else {
                format!("{}/{}", base, name)
            };
            match node {
                Node::Dir(children) => FileSystemNode {
                    name: name.clone(),
                    children: build_tree(children, &path),
                    path,
                    kind: NodeKind::Directory,
                },
                Node::File(_) => FileSystemNode {
                    name: name.clone(),
                    path,
                    kind: NodeKind::File,
                    children: Vec::new(),
                },
            }
        })
        .collect();
    nodes.sort_by(|a, b| {
        let rank = |n: &FileSystemNode| (n.kind == NodeKind::File) as u8;
        rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
    });
    nodes
}

#[async_trait]
impl VirtualFs for MemoryFs {
    fn is_mock(&self) -> bool {
        true
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, FsError> {
        let parts = components(path)?;
        self.with_root(|root| match lookup(root, &parts) {
            Some(NodeRef::Dir(children)) => Ok(children
                .iter()
                .map(|(name, node)| match node {
                    Node::Dir(_) => format!("{}/", name),
                    Node::File(_) => name.clone(),
                })
                .collect()),
            _ => Err(FsError::NotADirectory(path.to_string())),
        })
    }

    async fn read(&self, path: &str) -> Result<String, FsError> {
        let parts = components(path)?;
        self.with_root(|root| match lookup(root, &parts) {
            Some(NodeRef::File(content)) => Ok(content.clone()),
            Some(NodeRef::Dir(_)) => Err(FsError::NotAFile(path.to_string())),
            None => Err(FsError::NotFound(path.to_string())),
        })
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), FsError> {
        self.write_sync(path, content)
    }

    async fn mkdir(&self, path: &str) -> Result<(), FsError> {
        let parts = components(path)?;
        let Some((name, parents)) = parts.split_last() else {
            return Ok(());
        };
        self.with_root(|root| {
            let dir = descend(root, parents, true)?;
            match dir.get(name) {
                Some(Node::Dir(_)) => Ok(()),
                Some(Node::File(_)) => Err(FsError::FileExists(path.to_string())),
                None => {
                    dir.insert(name.clone(), Node::Dir(BTreeMap::new()));
                    Ok(())
                }
            }
        })
    }

    async fn remove(&self, path: &str) -> Result<(), FsError> {
        let parts = components(path)?;
        let Some((name, parents)) = parts.split_last() else {
            return Err(FsError::Root);
        };
        self.with_root(|root| {
            let dir = descend(root, parents, false)
                .map_err(|_| FsError::NotFound(path.to_string()))?;
            dir.remove(name)
                .map(|_| ())
                .ok_or_else(|| FsError::NotFound(path.to_string()))
        })
    }

    async fn tree(&self, path: &str) -> Result<Vec<FileSystemNode>, FsError> {
        let parts = components(path)?;
        let base = join_virtual(&parts);
        self.with_root(|root| match lookup(root, &parts) {
            Some(NodeRef::Dir(children)) => Ok(build_tree(children, &base)),
            _ => Err(FsError::NotADirectory(path.to_string())),
        })
    }

    async fn zip(&self, _dir: &str) -> Result<String, FsError> {
        Err(FsError::Unsupported("Zipping"))
    }

    async fn unzip(&self, _path: &str) -> Result<(), FsError> {
        Err(FsError::Unsupported("Unzipping"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_layout() {
        let fs = MemoryFs::seeded();
        assert_eq!(fs.list("/").await.unwrap(), vec!["README.md", "docs/"]);
        assert_eq!(
            fs.list("docs").await.unwrap(),
            vec!["getting-started.md", "guides/", "openai-containers-api.md"]
        );
        assert!(fs.read("/README.md").await.unwrap().contains("mock mode"));
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_overwrites() {
        let fs = MemoryFs::new();
        fs.write("/src/app/main.rs", "fn main() {}").await.unwrap();
        assert_eq!(fs.read("/src/app/main.rs").await.unwrap(), "fn main() {}");
        fs.write("/src/app/main.rs", "v2").await.unwrap();
        assert_eq!(fs.read("/src/app/main.rs").await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn test_errors() {
        let fs = MemoryFs::seeded();
        assert!(matches!(fs.read("/nope.md").await, Err(FsError::NotFound(_))));
        assert!(matches!(fs.read("/docs").await, Err(FsError::NotAFile(_))));
        assert!(matches!(fs.list("/README.md").await, Err(FsError::NotADirectory(_))));
        assert!(matches!(fs.mkdir("/README.md").await, Err(FsError::FileExists(_))));
        assert!(matches!(fs.remove("/").await, Err(FsError::Root)));
        assert!(matches!(fs.remove("/ghost/x").await, Err(FsError::NotFound(_))));
        assert!(matches!(fs.zip("/docs").await, Err(FsError::Unsupported(_))));
        assert!(matches!(fs.unzip("/a.zip").await, Err(FsError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_remove_directory_recursively() {
        let fs = MemoryFs::seeded();
        fs.remove("/docs").await.unwrap();
        assert_eq!(fs.list("/").await.unwrap(), vec!["README.md"]);
    }

    #[tokio::test]
    async fn test_tree_orders_directories_first() {
        let fs = MemoryFs::seeded();
        let tree = fs.tree("/").await.unwrap();
        assert_eq!(tree[0].name, "docs");
        assert_eq!(tree[0].kind, NodeKind::Directory);
        assert_eq!(tree[1].path, "/README.md");
        let docs = &tree[0].children;
        assert_eq!(docs[0].path, "/docs/guides");
        assert_eq!(docs[0].children[0].path, "/docs/guides/advanced-usage.md");
    }
}
