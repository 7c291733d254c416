//! Working trees: where file content lives before it is staged.
//!
//! Paths handed to a [`Worktree`] are already normalized
//! (`/`-separated, relative, no `.` or `..` components).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::warn;

use crate::error::SdkResult;

/// File access for a repository's working tree.
pub trait Worktree: Send + Sync {
    fn write(&self, path: &str, content: &[u8]) -> SdkResult<()>;

    /// File content, or `None` if there is no file at `path`.
    fn read(&self, path: &str) -> SdkResult<Option<Vec<u8>>>;

    /// All file paths, sorted.
    fn list(&self) -> SdkResult<Vec<String>>;

    fn exists(&self, path: &str) -> SdkResult<bool> {
        Ok(self.read(path)?.is_some())
    }
}

/// A working tree held in memory.
#[derive(Debug, Default)]
pub struct MemoryWorktree {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryWorktree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Worktree for MemoryWorktree {
    fn write(&self, path: &str, content: &[u8]) -> SdkResult<()> {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> SdkResult<Option<Vec<u8>>> {
        Ok(self.files.read().expect("lock poisoned").get(path).cloned())
    }

    fn list(&self) -> SdkResult<Vec<String>> {
        Ok(self.files.read().expect("lock poisoned").keys().cloned().collect())
    }
}

/// A working tree rooted at a directory on disk.
///
/// The repository metadata directory is never listed.
#[derive(Debug, Clone)]
pub struct DiskWorktree {
    root: PathBuf,
    metadata_dir: String,
}

impl DiskWorktree {
    pub fn new(root: impl Into<PathBuf>, metadata_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            metadata_dir: metadata_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |p, part| p.join(part))
    }
}

impl Worktree for DiskWorktree {
    fn write(&self, path: &str, content: &[u8]) -> SdkResult<()> {
        let file = self.file_path(path);
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(file, content)?;
        Ok(())
    }

    fn read(&self, path: &str) -> SdkResult<Option<Vec<u8>>> {
        let file = self.file_path(path);
        if file.is_dir() {
            return Ok(None);
        }
        match fs::read(&file) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> SdkResult<Vec<String>> {
        let mut out = Vec::new();
        let walker = walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !(e.depth() == 1 && e.file_name() == self.metadata_dir.as_str()));
        for entry in walker {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let parts: Option<Vec<&str>> = relative.iter().map(|p| p.to_str()).collect();
            match parts {
                Some(parts) => out.push(parts.join("/")),
                None => warn!(path = %entry.path().display(), "skipping non-UTF-8 path"),
            }
        }
        out.sort();
        Ok(out)
    }
}
