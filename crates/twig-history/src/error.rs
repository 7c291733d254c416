//! Error types for commit creation and history walks.

use twig_store::{ObjectKind, StoreError};
use twig_types::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Root commit with an empty tree while the policy forbids it.
    #[error("refusing to create an initial commit with an empty tree")]
    EmptyTree,

    #[error("tree not found: {0}")]
    TreeNotFound(ObjectId),

    #[error("{id} is a {actual}, not a tree")]
    NotATree { id: ObjectId, actual: ObjectKind },

    #[error("parent commit not found: {0}")]
    ParentNotFound(ObjectId),

    #[error("{id} is a {actual}, not a commit")]
    NotACommit { id: ObjectId, actual: ObjectKind },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;
