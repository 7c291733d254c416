use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::RawObject;
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, RawObject>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total body bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(RawObject::size)
            .sum()
    }

    /// Return a sorted list of all object IDs in the store.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        let map = self.objects.read().expect("lock poisoned");
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Insert bytes under an arbitrary id, bypassing hashing.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&self, id: ObjectId, object: RawObject) {
        self.objects.write().expect("lock poisoned").insert(id, object);
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read_raw(&self, id: &ObjectId) -> StoreResult<Option<RawObject>> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn write_raw(&self, object: &RawObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let mut map = self.objects.write().expect("lock poisoned");
        match map.get(&id) {
            Some(existing) if existing == object => {}
            Some(existing) => {
                return Err(StoreError::IntegrityViolation {
                    id,
                    reason: format!(
                        "existing {} of {} bytes differs from new {} of {} bytes",
                        existing.kind,
                        existing.size(),
                        object.kind,
                        object.size()
                    ),
                });
            }
            None => {
                map.insert(id, object.clone());
                debug!(id = %id.short_hex(), kind = %object.kind, size = object.size(), "object written");
            }
        }
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::*;
    use proptest::prelude::*;
    use twig_types::Signature;

    fn make_tree(store: &InMemoryObjectStore) -> ObjectId {
        let blob = store.put_blob(b"hello").unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "hello.txt", blob)]).unwrap();
        store.put(&Object::Tree(tree)).unwrap()
    }

    // -----------------------------------------------------------------------
    // Core reads and writes
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryObjectStore::new();
        let id = store.put_blob(b"hello world").unwrap();
        assert!(!id.is_null());
        assert_eq!(store.get_blob(&id).unwrap().data, b"hello world");
    }

    #[test]
    fn write_and_read_tree() {
        let store = InMemoryObjectStore::new();
        let id = make_tree(&store);
        let tree = store.get_tree(&id).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.get("hello.txt").is_some());
    }

    #[test]
    fn write_and_read_commit() {
        let store = InMemoryObjectStore::new();
        let tree = make_tree(&store);
        let sig = Signature::new("A", "a@example.com", 100, 0).unwrap();
        let commit = Commit::new(tree, vec![], sig.clone(), sig, "first");
        let id = store.put(&Object::Commit(commit.clone())).unwrap();
        assert_eq!(store.get(&id).unwrap(), Object::Commit(commit));
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = InMemoryObjectStore::new();
        let id = ObjectId::from_hash([5; 32]);
        assert!(store.read_raw(&id).unwrap().is_none());
        assert!(matches!(store.get(&id), Err(StoreError::ObjectNotFound(x)) if x == id));
    }

    #[test]
    fn typed_read_of_wrong_kind_is_malformed() {
        let store = InMemoryObjectStore::new();
        let id = store.put_blob(b"not a tree").unwrap();
        assert!(matches!(
            store.get_tree(&id),
            Err(StoreError::MalformedObject { .. })
        ));
        assert_eq!(store.kind_of(&id).unwrap(), ObjectKind::Blob);
    }

    // -----------------------------------------------------------------------
    // Content-addressing correctness
    // -----------------------------------------------------------------------

    #[test]
    fn same_content_produces_same_id() {
        let store = InMemoryObjectStore::new();
        let id1 = store.put_blob(b"identical content").unwrap();
        let id2 = store.put_blob(b"identical content").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn different_content_produces_different_ids() {
        let store = InMemoryObjectStore::new();
        let id1 = store.put_blob(b"aaa").unwrap();
        let id2 = store.put_blob(b"bbb").unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn conflicting_content_under_same_id_is_rejected() {
        let store = InMemoryObjectStore::new();
        let good = RawObject::new(ObjectKind::Blob, b"real".to_vec());
        let id = good.compute_id();
        store.insert_unchecked(id, RawObject::new(ObjectKind::Blob, b"forged".to_vec()));

        let err = store.write_raw(&good).unwrap_err();
        assert!(matches!(err, StoreError::IntegrityViolation { id: x, .. } if x == id));
    }

    #[test]
    fn exists_tracks_writes() {
        let store = InMemoryObjectStore::new();
        let absent = ObjectId::from_hash([1; 32]);
        assert!(!store.exists(&absent).unwrap());
        let id = store.put_blob(b"present").unwrap();
        assert!(store.exists(&id).unwrap());
    }

    #[test]
    fn write_batch_preserves_order() {
        let store = InMemoryObjectStore::new();
        let objects: Vec<RawObject> = [b"batch-1", b"batch-2", b"batch-3"]
            .iter()
            .map(|d| Blob::new(d.to_vec()).to_raw())
            .collect();
        let ids = store.write_batch(&objects).unwrap();
        assert_eq!(ids.len(), 3);
        for (id, obj) in ids.iter().zip(&objects) {
            assert_eq!(&store.get_raw(id).unwrap(), obj);
        }
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn total_bytes_and_ids() {
        let store = InMemoryObjectStore::new();
        assert!(store.is_empty());
        store.put_blob(b"12345").unwrap();
        store.put_blob(b"123456789").unwrap();
        assert_eq!(store.total_bytes(), 14);
        let ids = store.all_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] <= ids[1]);
    }

    #[test]
    fn concurrent_identical_writes_converge() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryObjectStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.put_blob(b"shared data").unwrap())
            })
            .collect();
        let ids: Vec<ObjectId> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        store.put_blob(b"x").unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
        assert!(debug.contains("object_count"));
    }

    proptest! {
        #[test]
        fn get_inverts_put(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let store = InMemoryObjectStore::new();
            let id = store.put_blob(&data).unwrap();
            prop_assert_eq!(store.get_blob(&id).unwrap().data, data);
        }
    }
}
