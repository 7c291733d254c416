//! High-level SDK for Twig.
//!
//! [`Repository`] ties the object store, staging index, commit chain and
//! references together behind the handful of operations a client needs:
//! `write`, `add`, `commit`, `read_head` and `cat_file_p`.
//!
//! ```
//! use twig_sdk::{RepoConfig, Repository};
//!
//! let mut repo = Repository::in_memory(RepoConfig::default()).unwrap();
//! repo.write("test.txt", b"hello").unwrap();
//! repo.add("test.txt").unwrap();
//! let head = repo.commit("first commit").unwrap();
//! assert_eq!(repo.read_head().unwrap(), head);
//! println!("{}", repo.cat_file_p(&head).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod pretty;
pub mod repository;
pub mod worktree;

pub use config::{CoreConfig, RepoConfig, UserConfig};
pub use error::{SdkError, SdkResult};
pub use repository::{Repository, Status, METADATA_DIR};
pub use worktree::{DiskWorktree, MemoryWorktree, Worktree};

// Re-export key types
pub use twig_history::LogEntry;
pub use twig_index::IndexEntry;
pub use twig_store::{Blob, Commit, EntryMode, Object, ObjectKind, ObjectStore, Tree, TreeEntry};
pub use twig_types::{ObjectId, Signature};
