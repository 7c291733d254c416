use twig_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The stored bytes do not decode as the expected kind of object.
    #[error("malformed object {id}: {reason}")]
    MalformedObject { id: ObjectId, reason: String },

    /// Stored content disagrees with its digest.
    #[error("integrity violation for {id}: {reason}")]
    IntegrityViolation { id: ObjectId, reason: String },

    /// A tree was constructed with invalid or duplicate entry names.
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
