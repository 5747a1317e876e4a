//! Disk-backed sandbox.
//!
//! Virtual paths are mapped under a single root directory. Every access is
//! validated so that neither `..` segments nor symlinks can escape the root.

use async_trait::async_trait;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::{components, join_virtual};
use crate::domain::error::FsError;
use crate::domain::traits::VirtualFs;
use crate::domain::types::{FileSystemNode, NodeKind};

#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    /// The root must exist; it is canonicalized once here.
    pub fn new(root: &Path) -> Result<Self, FsError> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a virtual path to a real path inside the root.
    pub fn validate_path(&self, path: &str) -> Result<(Vec<String>, PathBuf), FsError> {
        let parts = components(path)?;
        let mut real = self.root.clone();
        for part in &parts {
            real.push(part);
        }

        // Follow the deepest existing ancestor so symlinks are checked too.
        let mut probe = real.as_path();
        while !probe.exists() {
            match probe.parent() {
                Some(parent) => probe = parent,
                None => break,
            }
        }
        let canonical = probe.canonicalize()?;
        if !canonical.starts_with(&self.root) {
            return Err(FsError::AccessDenied(path.to_string()));
        }
        Ok((parts, real))
    }
}

fn blocking_error(e: tokio::task::JoinError) -> FsError {
    FsError::Io(std::io::Error::other(e))
}

fn archive_error(e: zip::result::ZipError) -> FsError {
    FsError::Archive(e.to_string())
}

/// Directories first, then files, each alphabetical.
fn walk(dir: &Path, base: &str) -> Result<Vec<FileSystemNode>, FsError> {
    let mut nodes = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let path = if base == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", base, name)
        };
        if entry.file_type()?.is_dir() {
            nodes.push(FileSystemNode {
                children: walk(&entry.path(), &path)?,
                name,
                path,
                kind: NodeKind::Directory,
            });
        } else {
            nodes.push(FileSystemNode {
                name,
                path,
                kind: NodeKind::File,
                children: Vec::new(),
            });
        }
    }
    nodes.sort_by(|a, b| {
        let rank = |n: &FileSystemNode| (n.kind == NodeKind::File) as u8;
        rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
    });
    Ok(nodes)
}

fn add_to_archive(
    writer: &mut zip::ZipWriter<File>,
    dir: &Path,
    prefix: &str,
) -> Result<(), FsError> {
    let options = zip::write::SimpleFileOptions::default();
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.ends_with(".zip.part") {
            continue;
        }
        let name = format!("{}/{}", prefix, file_name);
        if entry.file_type()?.is_dir() {
            writer.add_directory(format!("{}/", name), options).map_err(archive_error)?;
            add_to_archive(writer, &entry.path(), &name)?;
        } else {
            let mut buffer = Vec::new();
            File::open(entry.path())?.read_to_end(&mut buffer)?;
            writer.start_file(name, options).map_err(archive_error)?;
            writer.write_all(&buffer)?;
        }
    }
    Ok(())
}

#[async_trait]
impl VirtualFs for DiskFs {
    fn is_mock(&self) -> bool {
        false
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, FsError> {
        let (_, real) = self.validate_path(path)?;
        if !real.is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let mut entries = tokio::fs::read_dir(&real).await?;
        let mut listing = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().await?.is_dir() {
                listing.push(format!("{}/", name));
            } else {
                listing.push(name);
            }
        }
        listing.sort();
        Ok(listing)
    }

    async fn read(&self, path: &str) -> Result<String, FsError> {
        let (_, real) = self.validate_path(path)?;
        if real.is_dir() {
            return Err(FsError::NotAFile(path.to_string()));
        }
        if !real.exists() {
            return Err(FsError::NotFound(path.to_string()));
        }
        Ok(tokio::fs::read_to_string(real).await?)
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), FsError> {
        let (parts, real) = self.validate_path(path)?;
        if parts.is_empty() {
            return Err(FsError::Root);
        }
        if real.is_dir() {
            return Err(FsError::NotAFile(path.to_string()));
        }
        if let Some(parent) = real.parent() {
            if parent.is_file() {
                return Err(FsError::NotADirectory(path.to_string()));
            }
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(real, content).await?;
        Ok(())
    }

    async fn mkdir(&self, path: &str) -> Result<(), FsError> {
        let (_, real) = self.validate_path(path)?;
        if real.is_file() {
            return Err(FsError::FileExists(path.to_string()));
        }
        tokio::fs::create_dir_all(real).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), FsError> {
        let (parts, real) = self.validate_path(path)?;
        if parts.is_empty() {
            return Err(FsError::Root);
        }
        if real.is_dir() {
            tokio::fs::remove_dir_all(real).await?;
        } else if real.exists() {
            tokio::fs::remove_file(real).await?;
        } else {
            return Err(FsError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn tree(&self, path: &str) -> Result<Vec<FileSystemNode>, FsError> {
        let (parts, real) = self.validate_path(path)?;
        if !real.is_dir() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let base = join_virtual(&parts);
        tokio::task::spawn_blocking(move || walk(&real, &base))
            .await
            .map_err(blocking_error)?
    }

    async fn zip(&self, dir: &str) -> Result<String, FsError> {
        let (parts, real) = self.validate_path(dir)?;
        if !real.is_dir() {
            return Err(FsError::NotADirectory(dir.to_string()));
        }
        let dir_name = parts.last().cloned().unwrap_or_else(|| "archive".to_string());
        let parent_parts = &parts[..parts.len().saturating_sub(1)];
        let archive_virtual = match join_virtual(parent_parts).as_str() {
            "/" => format!("/{}.zip", dir_name),
            parent => format!("{}/{}.zip", parent, dir_name),
        };
        let (_, archive_real) = self.validate_path(&archive_virtual)?;

        tokio::task::spawn_blocking(move || -> Result<(), FsError> {
            // Build into a temp name so the archive never contains itself.
            let staging = archive_real.with_extension("zip.part");
            let mut writer = zip::ZipWriter::new(File::create(&staging)?);
            add_to_archive(&mut writer, &real, &dir_name)?;
            writer.finish().map_err(archive_error)?;
            std::fs::rename(&staging, &archive_real)?;
            Ok(())
        })
        .await
        .map_err(blocking_error)??;

        Ok(archive_virtual)
    }

    async fn unzip(&self, path: &str) -> Result<(), FsError> {
        let (_, real) = self.validate_path(path)?;
        if !real.is_file() {
            return Err(FsError::NotFound(path.to_string()));
        }
        let target = real.parent().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());

        tokio::task::spawn_blocking(move || -> Result<(), FsError> {
            let mut archive = zip::ZipArchive::new(File::open(&real)?).map_err(archive_error)?;
            for i in 0..archive.len() {
                let mut entry = archive.by_index(i).map_err(archive_error)?;
                let Some(relative) = entry.enclosed_name() else {
                    tracing::warn!("Skipping archive entry with unsafe path: {}", entry.name());
                    continue;
                };
                let out = target.join(relative);
                if entry.is_dir() {
                    std::fs::create_dir_all(&out)?;
                } else {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    let mut file = File::create(&out)?;
                    std::io::copy(&mut entry, &mut file)?;
                }
            }
            Ok(())
        })
        .await
        .map_err(blocking_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> (tempfile::TempDir, DiskFs) {
        let tmp = tempfile::tempdir().unwrap();
        let fs = DiskFs::new(tmp.path()).unwrap();
        (tmp, fs)
    }

    #[tokio::test]
    async fn test_write_read_list() {
        let (_tmp, fs) = sandbox();
        fs.write("/docs/a.md", "hello").await.unwrap();
        assert_eq!(fs.read("docs/a.md").await.unwrap(), "hello");
        assert_eq!(fs.list("/").await.unwrap(), vec!["docs/"]);
        assert_eq!(fs.list("/docs").await.unwrap(), vec!["a.md"]);
    }

    #[tokio::test]
    async fn test_escape_is_denied() {
        let (_tmp, fs) = sandbox();
        assert!(matches!(fs.read("/../../etc/passwd").await, Err(FsError::AccessDenied(_))));
        assert!(matches!(fs.write("/../x", "y").await, Err(FsError::AccessDenied(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_is_denied() {
        let (tmp, fs) = sandbox();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("link")).unwrap();
        assert!(matches!(fs.write("/link/x.txt", "y").await, Err(FsError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_remove_and_errors() {
        let (_tmp, fs) = sandbox();
        fs.mkdir("/a/b").await.unwrap();
        fs.write("/a/b/c.txt", "x").await.unwrap();
        assert!(matches!(fs.mkdir("/a/b/c.txt").await, Err(FsError::FileExists(_))));
        assert!(matches!(fs.read("/a").await, Err(FsError::NotAFile(_))));
        assert!(matches!(fs.read("/zzz").await, Err(FsError::NotFound(_))));
        assert!(matches!(fs.remove("/").await, Err(FsError::Root)));
        fs.remove("/a").await.unwrap();
        assert!(fs.list("/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zip_then_unzip_restores_directory() {
        let (_tmp, fs) = sandbox();
        fs.write("/proj/src/main.rs", "fn main() {}").await.unwrap();
        fs.write("/proj/README.md", "# proj").await.unwrap();

        let archive = fs.zip("/proj").await.unwrap();
        assert_eq!(archive, "/proj.zip");

        fs.remove("/proj").await.unwrap();
        fs.unzip(&archive).await.unwrap();
        assert_eq!(fs.read("/proj/src/main.rs").await.unwrap(), "fn main() {}");
        assert_eq!(fs.read("/proj/README.md").await.unwrap(), "# proj");
    }

    #[tokio::test]
    async fn test_tree_paths() {
        let (_tmp, fs) = sandbox();
        fs.write("/docs/guides/x.md", "x").await.unwrap();
        fs.write("/b.md", "b").await.unwrap();
        let tree = fs.tree("/").await.unwrap();
        assert_eq!(tree[0].path, "/docs");
        assert_eq!(tree[1].path, "/b.md");
        assert_eq!(tree[0].children[0].children[0].path, "/docs/guides/x.md");
    }
}
