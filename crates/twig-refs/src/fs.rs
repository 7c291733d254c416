//! On-disk reference store.
//!
//! Each ref is a file named after it under the store root: `<root>/HEAD`,
//! `<root>/refs/heads/main`. A file holds either a hex commit id or
//! `ref: <name>`, followed by a newline.
//!
//! Writers first create `<file>.lock` exclusively, check the current value,
//! write the new content into the lock file and rename it over the ref. A
//! second writer finds the lock present and fails with [`RefError::Locked`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;
use twig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::{Precondition, RefTarget, HEAD};

const LOCK_SUFFIX: &str = ".lock";

/// File-backed implementation of [`RefStore`].
#[derive(Debug, Clone)]
pub struct FsRefStore {
    root: PathBuf,
}

impl FsRefStore {
    /// Open (creating `refs/` if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("refs"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }

    fn lock(&self, name: &str) -> Result<RefLock> {
        validate_ref_name(name)?;
        RefLock::acquire(name, self.ref_path(name))
    }
}

/// Exclusive lock on one ref file. Removed on drop unless committed.
struct RefLock {
    name: String,
    target: PathBuf,
    lock_path: PathBuf,
    file: File,
    committed: bool,
}

impl RefLock {
    fn acquire(name: &str, target: PathBuf) -> Result<Self> {
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut lock_path = target.clone().into_os_string();
        lock_path.push(LOCK_SUFFIX);
        let lock_path = PathBuf::from(lock_path);

        let file = match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RefError::Locked(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            name: name.to_string(),
            target,
            lock_path,
            file,
            committed: false,
        })
    }

    fn commit(mut self, target: &RefTarget) -> Result<()> {
        writeln!(self.file, "{target}")?;
        self.file.sync_all()?;
        fs::rename(&self.lock_path, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for RefLock {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                warn!(reference = %self.name, error = %e, "failed to remove ref lock");
            }
        }
    }
}

impl RefStore for FsRefStore {
    fn read_raw(&self, name: &str) -> Result<Option<RefTarget>> {
        validate_ref_name(name)?;
        let path = self.ref_path(name);
        if path.is_dir() {
            return Ok(None);
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        RefTarget::parse(&text).map(Some).ok_or_else(|| RefError::Corrupt {
            name: name.to_string(),
            reason: format!("unparseable content {:?}", text.trim()),
        })
    }

    fn write_direct(&self, name: &str, precondition: Precondition, new: ObjectId) -> Result<()> {
        let lock = self.lock(name)?;
        if let Precondition::Matches(expected) = precondition {
            let current = self.read_raw(name)?.and_then(|t| t.as_direct());
            if expected != current {
                return Err(RefError::StaleReference {
                    name: name.to_string(),
                    expected,
                    actual: current,
                });
            }
        }
        lock.commit(&RefTarget::Direct(new))
    }

    fn set_symbolic(&self, name: &str, target: &str) -> Result<()> {
        validate_ref_name(target)?;
        self.lock(name)?
            .commit(&RefTarget::Symbolic(target.to_string()))
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let _lock = self.lock(name)?;
        match fs::remove_file(self.ref_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<(String, RefTarget)>> {
        let mut out = Vec::new();
        if HEAD.starts_with(prefix) {
            if let Some(target) = self.read_raw(HEAD)? {
                out.push((HEAD.to_string(), target));
            }
        }

        for entry in walkdir::WalkDir::new(self.root.join("refs")).sort_by_file_name() {
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
            let Some(parts) = parts else {
                warn!(path = %entry.path().display(), "ignoring non-UTF-8 ref path");
                continue;
            };
            let name = parts.join("/");
            if name.ends_with(LOCK_SUFFIX) {
                warn!(path = %entry.path().display(), "leftover ref lock file");
                continue;
            }
            if !name.starts_with(prefix) {
                continue;
            }
            if let Some(target) = self.read_raw(&name)? {
                out.push((name, target));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}
