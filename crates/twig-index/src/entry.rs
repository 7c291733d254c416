//! Index entry type.

use serde::{Deserialize, Serialize};
use twig_store::EntryMode;
use twig_tree::PathEntry;
use twig_types::ObjectId;

/// An entry in the staging index, representing one staged file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Normalized `/`-separated path relative to the repository root.
    pub path: String,
    /// Content-addressed ID of the file's blob in the object store.
    pub object_id: ObjectId,
    /// File mode (regular, executable, symlink).
    pub mode: EntryMode,
    /// Blob size in bytes.
    pub size: u64,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, object_id: ObjectId, mode: EntryMode, size: u64) -> Self {
        Self {
            path: path.into(),
            object_id,
            mode,
            size,
        }
    }

    /// The tree-builder view of this entry.
    pub fn path_entry(&self) -> PathEntry {
        PathEntry::new(self.object_id, self.mode)
    }
}
