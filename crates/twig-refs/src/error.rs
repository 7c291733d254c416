//! Error types for reference operations.

use thiserror::Error;
use twig_types::ObjectId;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference was never set, or names an unborn branch.
    #[error("unknown reference: {0}")]
    UnknownReference(String),

    /// The ref name breaks the naming rules.
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A compare-and-swap found a different value than expected.
    #[error(
        "stale reference {name}: expected {}, found {}",
        describe(.expected),
        describe(.actual)
    )]
    StaleReference {
        name: String,
        expected: Option<ObjectId>,
        actual: Option<ObjectId>,
    },

    /// Symbolic refs chained deeper than the resolution limit.
    #[error("symbolic ref loop at {0}")]
    SymbolicLoop(String),

    /// Another writer holds the lock for this ref.
    #[error("ref is locked: {0}")]
    Locked(String),

    /// A stored ref could not be parsed.
    #[error("corrupt ref {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe(id: &Option<ObjectId>) -> String {
    match id {
        Some(id) => id.to_hex(),
        None => "nothing".into(),
    }
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
