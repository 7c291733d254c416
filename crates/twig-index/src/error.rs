//! Error types for the index crate.

use twig_types::ObjectId;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The specified path is not staged.
    #[error("path not staged: {0}")]
    PathNotStaged(String),

    /// An invalid path was provided.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// An object referenced by the index was not found in the store.
    #[error("object not found in store: {0}")]
    ObjectNotFound(ObjectId),

    /// The on-disk index file could not be decoded.
    #[error("corrupt index file: {0}")]
    Corrupt(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),

    /// Tree construction failed.
    #[error("tree error: {0}")]
    Tree(#[from] twig_tree::TreeError),

    /// I/O error while reading or writing the index file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
