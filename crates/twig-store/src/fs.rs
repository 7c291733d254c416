//! On-disk loose-object store.
//!
//! Layout: `<root>/<first 2 hex chars>/<remaining 62 hex chars>`. Each file
//! holds the zstd-compressed framed object (`"<kind> <len>\0<body>"`).
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never observes a partially written object.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::RawObject;
use crate::traits::ObjectStore;

/// Default zstd compression level.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Loose-object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    compression_level: i32,
}

impl FsObjectStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        })
    }

    /// Use a different zstd level for subsequent writes.
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    /// All object IDs present on disk, sorted.
    pub fn all_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let dir = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str());
            let file = entry.file_name().to_str();
            match (dir, file) {
                (Some(dir), Some(file)) => match ObjectId::from_hex(&format!("{dir}{file}")) {
                    Ok(id) => ids.push(id),
                    Err(_) => warn!(path = %entry.path().display(), "ignoring stray file in object store"),
                },
                _ => warn!(path = %entry.path().display(), "ignoring non-UTF-8 path in object store"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn decode_file(&self, id: &ObjectId, compressed: &[u8]) -> StoreResult<RawObject> {
        let framed = zstd::decode_all(compressed).map_err(|e| StoreError::MalformedObject {
            id: *id,
            reason: format!("decompression failed: {e}"),
        })?;
        let raw = RawObject::from_framed(&framed)
            .map_err(|reason| StoreError::MalformedObject { id: *id, reason })?;
        let computed = raw.compute_id();
        if computed != *id {
            return Err(StoreError::IntegrityViolation {
                id: *id,
                reason: format!("content hashes to {computed}"),
            });
        }
        Ok(raw)
    }
}

impl ObjectStore for FsObjectStore {
    fn read_raw(&self, id: &ObjectId) -> StoreResult<Option<RawObject>> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        self.decode_file(id, &compressed).map(Some)
    }

    fn write_raw(&self, object: &RawObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if let Some(existing) = self.read_raw(&id)? {
            if existing != *object {
                return Err(StoreError::IntegrityViolation {
                    id,
                    reason: "stored object differs from new content".into(),
                });
            }
            return Ok(id);
        }

        let path = self.object_path(&id);
        let dir = path
            .parent()
            .ok_or_else(|| io::Error::other("object path has no parent"))?;
        fs::create_dir_all(dir)?;

        let compressed = zstd::encode_all(&object.to_framed()[..], self.compression_level)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size(), "object written to disk");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Blob, EntryMode, Object, ObjectKind, Tree, TreeEntry};

    fn temp_store() -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn write_then_read_blob() {
        let (_dir, store) = temp_store();
        let id = store.put_blob(b"on disk").unwrap();
        assert!(store.exists(&id).unwrap());
        assert_eq!(store.get_blob(&id).unwrap().data, b"on disk");
    }

    #[test]
    fn object_path_uses_fanout() {
        let (_dir, store) = temp_store();
        let id = store.put_blob(b"fanout").unwrap();
        let hex = id.to_hex();
        let path = store.object_path(&id);
        assert!(path.ends_with(Path::new(&hex[..2]).join(&hex[2..])));
        assert!(path.is_file());
    }

    #[test]
    fn rewrite_is_noop() {
        let (_dir, store) = temp_store();
        let id1 = store.put_blob(b"same").unwrap();
        let id2 = store.put_blob(b"same").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.all_ids().unwrap(), vec![id1]);
    }

    #[test]
    fn missing_object_reads_none() {
        let (_dir, store) = temp_store();
        let id = ObjectId::from_hash([4; 32]);
        assert!(store.read_raw(&id).unwrap().is_none());
        assert!(matches!(store.get(&id), Err(StoreError::ObjectNotFound(_))));
    }

    #[test]
    fn tree_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("objects");
        let tree_id = {
            let store = FsObjectStore::open(&root).unwrap();
            let blob = store.put_blob(b"x").unwrap();
            let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "x", blob)]).unwrap();
            store.put(&Object::Tree(tree)).unwrap()
        };
        let reopened = FsObjectStore::open(&root).unwrap();
        assert_eq!(reopened.get_tree(&tree_id).unwrap().len(), 1);
    }

    #[test]
    fn tampered_file_is_integrity_violation() {
        let (_dir, store) = temp_store();
        let id = store.put_blob(b"genuine").unwrap();
        let forged = zstd::encode_all(&Blob::new(b"forged".to_vec()).to_raw().to_framed()[..], 3)
            .unwrap();
        fs::write(store.object_path(&id), forged).unwrap();

        assert!(matches!(
            store.read_raw(&id),
            Err(StoreError::IntegrityViolation { .. })
        ));
        assert!(matches!(
            store.put_blob(b"genuine"),
            Err(StoreError::IntegrityViolation { .. })
        ));
    }

    #[test]
    fn garbage_file_is_malformed() {
        let (_dir, store) = temp_store();
        let id = store.put_blob(b"soon garbage").unwrap();
        fs::write(store.object_path(&id), b"definitely not zstd").unwrap();
        assert!(matches!(
            store.read_raw(&id),
            Err(StoreError::MalformedObject { .. })
        ));
    }

    #[test]
    fn all_ids_skips_stray_files() {
        let (_dir, store) = temp_store();
        let id = store.put_blob(b"real").unwrap();
        fs::create_dir_all(store.root().join("zz")).unwrap();
        fs::write(store.root().join("zz").join("not-an-object"), b"").unwrap();
        assert_eq!(store.all_ids().unwrap(), vec![id]);
    }

    #[test]
    fn compression_level_is_configurable() {
        let (_dir, store) = temp_store();
        let store = store.with_compression_level(19);
        let raw = RawObject::new(ObjectKind::Blob, vec![b'a'; 4096]);
        let id = store.write_raw(&raw).unwrap();
        let on_disk = fs::metadata(store.object_path(&id)).unwrap().len();
        assert!(on_disk < 4096);
        assert_eq!(store.get_raw(&id).unwrap(), raw);
    }
}
