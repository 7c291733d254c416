//! Persistence of the staging index.
//!
//! The file is a bincode-encoded [`IndexFile`]: a four byte magic, a format
//! version and the entries in path order. Saving goes through a temporary
//! sibling and a rename, so a crash leaves either the old or the new index.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use twig_store::ObjectStore;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};
use crate::index::Index;

/// Leading bytes of every index file.
pub const INDEX_MAGIC: [u8; 4] = *b"TWIX";

/// Current on-disk format version.
pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    magic: [u8; 4],
    version: u32,
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Load the index stored at `path`.
    ///
    /// A missing file yields an empty index.
    pub fn load(path: &Path, store: Arc<dyn ObjectStore>) -> IndexResult<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new(store)),
            Err(e) => return Err(e.into()),
        };
        let file: IndexFile =
            bincode::deserialize(&bytes).map_err(|e| IndexError::Corrupt(e.to_string()))?;
        if file.magic != INDEX_MAGIC {
            return Err(IndexError::Corrupt("bad magic".into()));
        }
        if file.version != INDEX_VERSION {
            return Err(IndexError::Corrupt(format!(
                "unsupported version {}",
                file.version
            )));
        }
        debug!(path = %path.display(), entries = file.entries.len(), "index loaded");
        Ok(Self::from_entries(store, file.entries))
    }

    /// Atomically write the index to `path`.
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let file = IndexFile {
            magic: INDEX_MAGIC,
            version: INDEX_VERSION,
            entries: self.entries().cloned().collect(),
        };
        let bytes = bincode::serialize(&file).map_err(io::Error::other)?;

        let dir = path
            .parent()
            .ok_or_else(|| io::Error::other("index path has no parent"))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| IndexError::Io(e.error))?;

        debug!(path = %path.display(), entries = file.entries.len(), "index saved");
        Ok(())
    }
}
