//! History walks over stored commits.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use twig_store::Commit;
use twig_types::ObjectId;

use crate::chain::CommitChain;
use crate::error::HistoryResult;

/// A commit yielded by [`CommitChain::log`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub id: ObjectId,
    pub commit: Commit,
}

impl CommitChain {
    /// First-parent history from `start`, newest first.
    ///
    /// Stops after `limit` entries when one is given.
    pub fn log(&self, start: ObjectId, limit: Option<usize>) -> HistoryResult<Vec<LogEntry>> {
        let mut out = Vec::new();
        let mut next = Some(start);
        while let Some(id) = next {
            if limit.is_some_and(|max| out.len() >= max) {
                break;
            }
            let commit = self.get(&id)?;
            next = commit.parents.first().copied();
            out.push(LogEntry { id, commit });
        }
        Ok(out)
    }

    /// Every commit reachable from `start` (itself included), breadth-first.
    pub fn ancestors(&self, start: ObjectId) -> HistoryResult<Vec<ObjectId>> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            order.push(current);
            for parent in self.get(&current)?.parents {
                if visited.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        Ok(order)
    }

    /// `true` if `ancestor` is reachable from `descendant`. A commit is its
    /// own ancestor.
    pub fn is_ancestor(&self, ancestor: ObjectId, descendant: ObjectId) -> HistoryResult<bool> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([descendant]);
        while let Some(current) = queue.pop_front() {
            if current == ancestor {
                return Ok(true);
            }
            if !visited.insert(current) {
                continue;
            }
            queue.extend(self.get(&current)?.parents);
        }
        Ok(false)
    }
}
