//! Commit chain for Twig.
//!
//! Creates commit objects whose tree and parents are known to exist, and
//! walks the resulting history. Nothing here touches references: moving a
//! branch to a new commit is the caller's job.
//!
//! # Key Types
//!
//! - [`CommitChain`] -- commit creation and history queries over an object store
//! - [`CommitPolicy`] -- rules applied before a commit is written
//! - [`LogEntry`] -- one commit yielded by a log walk

pub mod chain;
pub mod error;
pub mod walk;

pub use chain::{CommitChain, CommitPolicy};
pub use error::{HistoryError, HistoryResult};
pub use walk::LogEntry;
