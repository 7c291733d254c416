use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a twig repository: {0}")]
    NotARepository(PathBuf),

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    /// The worktree has no file at this path.
    #[error("path not found in worktree: {0}")]
    PathNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid value: {0}")]
    Types(#[from] twig_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] twig_store::StoreError),

    #[error("tree error: {0}")]
    Tree(#[from] twig_tree::TreeError),

    #[error("index error: {0}")]
    Index(#[from] twig_index::IndexError),

    #[error("ref error: {0}")]
    Ref(#[from] twig_refs::RefError),

    #[error("history error: {0}")]
    History(#[from] twig_history::HistoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
