use twig_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{Blob, Commit, Object, ObjectKind, RawObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - `write_raw` is deterministic and idempotent: the same object always
///   yields the same ID and rewriting it changes nothing.
/// - An existing ID is never overwritten with different bytes; such an
///   attempt fails with [`StoreError::IntegrityViolation`].
/// - Concurrent reads and writes are safe.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an undecoded object by ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn read_raw(&self, id: &ObjectId) -> StoreResult<Option<RawObject>>;

    /// Write an undecoded object and return its content-addressed ID.
    fn write_raw(&self, object: &RawObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Store an object, returning its digest.
    fn put(&self, object: &Object) -> StoreResult<ObjectId> {
        self.write_raw(&object.to_raw())
    }

    /// Read an object that must exist.
    fn get_raw(&self, id: &ObjectId) -> StoreResult<RawObject> {
        self.read_raw(id)?.ok_or(StoreError::ObjectNotFound(*id))
    }

    /// Read and decode an object.
    fn get(&self, id: &ObjectId) -> StoreResult<Object> {
        Object::from_raw(&self.get_raw(id)?)
    }

    /// Kind of a stored object without decoding its body.
    fn kind_of(&self, id: &ObjectId) -> StoreResult<ObjectKind> {
        Ok(self.get_raw(id)?.kind)
    }

    /// Store raw bytes as a blob.
    fn put_blob(&self, data: &[u8]) -> StoreResult<ObjectId> {
        self.write_raw(&RawObject::new(ObjectKind::Blob, data.to_vec()))
    }

    fn get_blob(&self, id: &ObjectId) -> StoreResult<Blob> {
        Blob::from_raw(&self.get_raw(id)?)
    }

    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        Tree::from_raw(&self.get_raw(id)?)
    }

    fn get_commit(&self, id: &ObjectId) -> StoreResult<Commit> {
        Commit::from_raw(&self.get_raw(id)?)
    }

    /// Write multiple objects and return their IDs in order.
    fn write_batch(&self, objects: &[RawObject]) -> StoreResult<Vec<ObjectId>> {
        objects.iter().map(|obj| self.write_raw(obj)).collect()
    }
}
