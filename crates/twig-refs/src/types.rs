//! Core reference types.

use std::fmt;

use serde::{Deserialize, Serialize};
use twig_types::ObjectId;

/// Name of the symbolic ref that tracks the current branch.
pub const HEAD: &str = "HEAD";

/// Maximum number of symbolic hops followed while resolving a name.
pub const MAX_SYMBOLIC_DEPTH: usize = 5;

/// What a reference points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefTarget {
    /// A commit id.
    Direct(ObjectId),
    /// Another ref, by full name (e.g. `refs/heads/main`).
    Symbolic(String),
}

impl RefTarget {
    pub fn as_direct(&self) -> Option<ObjectId> {
        match self {
            RefTarget::Direct(id) => Some(*id),
            RefTarget::Symbolic(_) => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, RefTarget::Symbolic(_))
    }

    /// Parse the textual form written by [`Display`](fmt::Display):
    /// `ref: <name>` or a hex id, surrounding whitespace ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.strip_prefix("ref:") {
            Some(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| RefTarget::Symbolic(name.to_string()))
            }
            None => ObjectId::from_hex(text).ok().map(RefTarget::Direct),
        }
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Direct(id) => write!(f, "{id}"),
            RefTarget::Symbolic(name) => write!(f, "ref: {name}"),
        }
    }
}

/// Condition a direct write must satisfy to take effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precondition {
    /// Overwrite whatever is there.
    Any,
    /// The ref must currently hold this value (`None`: must not exist).
    Matches(Option<ObjectId>),
}

impl Precondition {
    pub fn allows(&self, current: Option<ObjectId>) -> bool {
        match self {
            Precondition::Any => true,
            Precondition::Matches(expected) => *expected == current,
        }
    }
}
