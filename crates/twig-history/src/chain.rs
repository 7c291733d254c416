use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use twig_store::{Commit, Object, ObjectKind, ObjectStore};
use twig_types::{ObjectId, Signature};

use crate::error::{HistoryError, HistoryResult};

/// Rules checked before a commit is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPolicy {
    /// Allow a parentless commit whose tree has no entries.
    pub allow_empty_initial: bool,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self {
            allow_empty_initial: true,
        }
    }
}

/// Creates commits and walks history over an object store.
pub struct CommitChain {
    pub(crate) store: Arc<dyn ObjectStore>,
    policy: CommitPolicy,
}

impl CommitChain {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_policy(store, CommitPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn ObjectStore>, policy: CommitPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Write a commit of `tree` on top of `parents`.
    ///
    /// The tree must be a stored tree and every parent a stored commit.
    /// References are left alone.
    pub fn commit(
        &self,
        tree: ObjectId,
        parents: Vec<ObjectId>,
        message: impl Into<String>,
        author: Signature,
        committer: Signature,
    ) -> HistoryResult<ObjectId> {
        let tree_raw = self
            .store
            .read_raw(&tree)?
            .ok_or(HistoryError::TreeNotFound(tree))?;
        if tree_raw.kind != ObjectKind::Tree {
            return Err(HistoryError::NotATree {
                id: tree,
                actual: tree_raw.kind,
            });
        }

        for parent in &parents {
            let kind = self
                .store
                .read_raw(parent)?
                .ok_or(HistoryError::ParentNotFound(*parent))?
                .kind;
            if kind != ObjectKind::Commit {
                return Err(HistoryError::NotACommit {
                    id: *parent,
                    actual: kind,
                });
            }
        }

        // An empty tree encodes to an empty body.
        if parents.is_empty() && tree_raw.body.is_empty() && !self.policy.allow_empty_initial {
            return Err(HistoryError::EmptyTree);
        }

        let commit = Commit::new(tree, parents, author, committer, message);
        let id = self.store.put(&Object::Commit(commit.clone()))?;
        info!(
            id = %id.short_hex(),
            tree = %tree.short_hex(),
            parents = commit.parents.len(),
            summary = commit.summary(),
            "commit created"
        );
        Ok(id)
    }

    /// Load a commit, reporting a non-commit id as [`HistoryError::NotACommit`].
    pub fn get(&self, id: &ObjectId) -> HistoryResult<Commit> {
        let raw = self.store.get_raw(id)?;
        if raw.kind != ObjectKind::Commit {
            return Err(HistoryError::NotACommit {
                id: *id,
                actual: raw.kind,
            });
        }
        Ok(Commit::from_raw(&raw)?)
    }
}
