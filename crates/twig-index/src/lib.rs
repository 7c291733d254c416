//! Staging index for Twig.
//!
//! Maps repository paths to staged blob ids and builds the tree for the next
//! commit. The index survives commits: committing snapshots it without
//! clearing it.
//!
//! # Key Types
//!
//! - [`Index`] -- The in-memory staging area (BTreeMap-backed)
//! - [`IndexEntry`] -- A staged file entry
//! - [`normalize_path`] -- Path validation shared with callers

pub mod entry;
pub mod error;
pub mod file;
pub mod index;

pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
pub use index::{normalize_path, Index};
