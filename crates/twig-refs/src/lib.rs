//! Reference management for Twig.
//!
//! References are the human-readable entry points into the commit chain,
//! analogous to git refs.
//!
//! # Architecture
//!
//! - **Branches** live under `refs/heads/` and hold a commit id directly.
//!   They advance through [`RefStore::compare_and_swap`] so concurrent
//!   writers cannot silently lose each other's commits.
//! - **HEAD** is a symbolic ref naming the current branch. Reads and
//!   updates through `HEAD` follow it to the branch, which may not exist yet
//!   ("unborn") before the first commit.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- [`RefTarget`] and the [`Precondition`] of a write
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`names`] -- Git-style ref name validation
//! - [`memory`] -- In-memory [`InMemoryRefStore`]
//! - [`fs`] -- On-disk [`FsRefStore`] using lock files

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::{branch_ref, validate_branch_name, validate_ref_name};
pub use traits::RefStore;
pub use types::{Precondition, RefTarget, HEAD, MAX_SYMBOLIC_DEPTH};
