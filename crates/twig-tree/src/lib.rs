//! Tree construction for Twig.
//!
//! Converts a flat `path -> (object id, mode)` mapping into nested tree
//! objects and back. Directory nodes live in an index-based arena while a
//! tree is being assembled; they are persisted bottom-up so every subtree id
//! is known before its parent is encoded.
//!
//! # Key Types
//!
//! - [`TreeBuilder`] -- incremental builder over an [`ObjectStore`](twig_store::ObjectStore)
//! - [`PathEntry`] / [`PathMap`] -- the flat mapping consumed and produced here
//! - [`flatten`] -- inverse of [`build`]

pub mod builder;
pub mod error;
pub mod walk;

pub use builder::{build, PathEntry, PathMap, TreeBuilder};
pub use error::{TreeError, TreeResult};
pub use walk::{flatten, resolve_path};
