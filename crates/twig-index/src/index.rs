//! The core Index structure managing staged entries in memory.
//!
//! The [`Index`] manages a `BTreeMap<String, IndexEntry>` as the staging
//! area. Reading files from a working tree is the caller's job; the index
//! only sees bytes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use twig_store::{EntryMode, ObjectKind, ObjectStore};
use twig_tree::PathMap;
use twig_types::ObjectId;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};

/// Validate and normalize a repository-relative path.
///
/// Leading `./` segments are dropped. Empty, absolute, and paths with empty,
/// `.` or `..` components are rejected.
pub fn normalize_path(path: &str) -> IndexResult<String> {
    let invalid = |reason: &str| IndexError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let mut trimmed = path;
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid("path must be relative"));
    }
    if trimmed.contains('\0') {
        return Err(invalid("path contains NUL"));
    }
    for component in trimmed.split('/') {
        match component {
            "" => return Err(invalid("path has an empty component")),
            "." | ".." => return Err(invalid("path has a '.' or '..' component")),
            _ => {}
        }
    }
    Ok(trimmed.to_string())
}

/// The staging index: which content goes into the next commit.
///
/// Entries are kept in a `BTreeMap` keyed by normalized path. The `store`
/// receives blobs on staging and trees on [`write_tree`](Self::write_tree).
pub struct Index {
    /// All staged entries, keyed by path.
    entries: BTreeMap<String, IndexEntry>,
    /// Tree id of the current entries (invalidated on change).
    tree_cache: Option<ObjectId>,
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("entries", &self.entries.len())
            .field("tree_cache", &self.tree_cache)
            .finish()
    }
}

impl Index {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            entries: BTreeMap::new(),
            tree_cache: None,
            store,
        }
    }

    /// Rebuild an index from previously saved entries.
    pub fn from_entries(
        store: Arc<dyn ObjectStore>,
        entries: impl IntoIterator<Item = IndexEntry>,
    ) -> Self {
        let mut index = Self::new(store);
        for entry in entries {
            index.entries.insert(entry.path.clone(), entry);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// The store this index writes to.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    // ---------------------------------------------------------------
    // Stage operations
    // ---------------------------------------------------------------

    /// Store `content` as a blob and stage it at `path`.
    ///
    /// Any prior entry for the path is replaced. Returns `false` when the
    /// path was already staged with identical content and mode.
    pub fn add(&mut self, path: &str, content: &[u8], mode: EntryMode) -> IndexResult<bool> {
        let path = normalize_path(path)?;
        let object_id = self.store.put_blob(content)?;
        Ok(self.insert(IndexEntry::new(path, object_id, mode, content.len() as u64)))
    }

    /// Stage an object already present in the store.
    pub fn stage_object(
        &mut self,
        path: &str,
        object_id: ObjectId,
        mode: EntryMode,
    ) -> IndexResult<bool> {
        let path = normalize_path(path)?;
        let raw = self
            .store
            .read_raw(&object_id)?
            .ok_or(IndexError::ObjectNotFound(object_id))?;
        if raw.kind != ObjectKind::Blob || mode == EntryMode::Directory {
            return Err(IndexError::InvalidPath {
                path,
                reason: format!("only blobs can be staged, got {} with mode {mode}", raw.kind),
            });
        }
        Ok(self.insert(IndexEntry::new(path, object_id, mode, raw.size())))
    }

    fn insert(&mut self, entry: IndexEntry) -> bool {
        if self.entries.get(&entry.path) == Some(&entry) {
            return false;
        }
        debug!(path = %entry.path, id = %entry.object_id.short_hex(), "staged");
        self.entries.insert(entry.path.clone(), entry);
        self.tree_cache = None;
        true
    }

    /// Remove a staged path.
    pub fn remove(&mut self, path: &str) -> IndexResult<IndexEntry> {
        let key = normalize_path(path)?;
        let removed = self
            .entries
            .remove(&key)
            .ok_or(IndexError::PathNotStaged(key))?;
        debug!(path = %removed.path, "unstaged");
        self.tree_cache = None;
        Ok(removed)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tree_cache = None;
    }

    /// Current staged state as a flat path map. Does not mutate the index.
    pub fn snapshot(&self) -> PathMap {
        self.entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.path_entry()))
            .collect()
    }

    // ---------------------------------------------------------------
    // Tree building
    // ---------------------------------------------------------------

    /// Build and store the tree for the current entries.
    pub fn write_tree(&mut self) -> IndexResult<ObjectId> {
        if let Some(id) = self.tree_cache {
            return Ok(id);
        }
        let tree_id = twig_tree::build(self.store.as_ref(), &self.snapshot())?;
        self.tree_cache = Some(tree_id);
        Ok(tree_id)
    }

    /// Replace the index contents with the files of a stored tree.
    pub fn read_tree(&mut self, tree_id: &ObjectId) -> IndexResult<()> {
        let files = twig_tree::flatten(self.store.as_ref(), tree_id)?;
        let mut entries = BTreeMap::new();
        for (path, file) in files {
            let size = self.store.get_raw(&file.object_id)?.size();
            entries.insert(
                path.clone(),
                IndexEntry::new(path, file.object_id, file.mode, size),
            );
        }
        self.entries = entries;
        self.tree_cache = Some(*tree_id);
        Ok(())
    }
}
