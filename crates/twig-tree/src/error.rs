//! Error types for tree construction.

/// Errors that can occur while building or walking trees.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A path is empty or has an unusable component.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A path is used both as a file and as a directory.
    #[error("path conflict: {0:?} is both a file and a directory")]
    PathConflict(String),

    /// Flat mappings hold files only; directories are implied by paths.
    #[error("directory mode not allowed for staged path {0:?}")]
    DirectoryMode(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
