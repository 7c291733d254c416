//! Content-addressed object storage for Twig.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Blobs, trees and commits are stored as
//! immutable objects identified by the BLAKE3 digest of their framed
//! canonical encoding (`"<kind> <len>\0<body>"`).
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- directory listing mapping names to object references
//! - [`Commit`] -- a tree snapshot plus parents, author and message
//!
//! [`Object`] is the closed sum over the three.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- zstd-compressed loose objects on disk
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written.
//! 2. A write for an id already present is a no-op when the bytes agree and
//!    an [`StoreError::IntegrityViolation`] when they do not.
//! 3. Concurrent reads and writes are safe without external locking.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{
    validate_entry_name, Blob, Commit, EntryMode, Object, ObjectKind, RawObject, Tree, TreeEntry,
};
pub use traits::ObjectStore;
