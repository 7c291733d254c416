//! In-memory reference store for testing and ephemeral repositories.
//!
//! [`InMemoryRefStore`] keeps all refs in a `BTreeMap` behind a `RwLock`.
//! The write lock is held across the precondition check of a
//! compare-and-swap, so the check and the write are one atomic step.

use std::collections::BTreeMap;
use std::sync::RwLock;

use twig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::{Precondition, RefTarget};

/// An in-memory implementation of [`RefStore`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, RefTarget>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_raw(&self, name: &str) -> Result<Option<RefTarget>> {
        validate_ref_name(name)?;
        Ok(self.refs.read().expect("lock poisoned").get(name).cloned())
    }

    fn write_direct(&self, name: &str, precondition: Precondition, new: ObjectId) -> Result<()> {
        validate_ref_name(name)?;
        let mut refs = self.refs.write().expect("lock poisoned");
        let current = refs.get(name).and_then(RefTarget::as_direct);
        if let Precondition::Matches(expected) = precondition {
            if expected != current {
                return Err(RefError::StaleReference {
                    name: name.to_string(),
                    expected,
                    actual: current,
                });
            }
        }
        refs.insert(name.to_string(), RefTarget::Direct(new));
        Ok(())
    }

    fn set_symbolic(&self, name: &str, target: &str) -> Result<()> {
        validate_ref_name(name)?;
        validate_ref_name(target)?;
        self.refs
            .write()
            .expect("lock poisoned")
            .insert(name.to_string(), RefTarget::Symbolic(target.to_string()));
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        validate_ref_name(name)?;
        Ok(self.refs.write().expect("lock poisoned").remove(name).is_some())
    }

    fn list(&self, prefix: &str) -> Result<Vec<(String, RefTarget)>> {
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, target)| (name.clone(), target.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::branch_ref;
    use crate::types::HEAD;
    use std::sync::Arc;
    use std::thread;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 32])
    }

    /// Store with `HEAD -> refs/heads/main`, main unborn.
    fn fresh() -> InMemoryRefStore {
        let store = InMemoryRefStore::new();
        store.set_symbolic(HEAD, &branch_ref("main")).unwrap();
        store
    }

    #[test]
    fn unborn_head_is_unknown() {
        let store = fresh();
        assert!(matches!(store.read_head(), Err(RefError::UnknownReference(n)) if n == HEAD));
        assert_eq!(store.try_read(HEAD).unwrap(), None);
        assert_eq!(store.head_target().unwrap().as_deref(), Some("refs/heads/main"));
    }

    #[test]
    fn update_through_head_moves_branch() {
        let store = fresh();
        store.update(HEAD, oid(1)).unwrap();
        assert_eq!(store.read("refs/heads/main").unwrap(), oid(1));
        assert_eq!(store.read_head().unwrap(), oid(1));
        // HEAD itself stays symbolic.
        assert!(store.read_raw(HEAD).unwrap().unwrap().is_symbolic());
    }

    #[test]
    fn cas_from_unborn() {
        let store = fresh();
        store.compare_and_swap(HEAD, None, oid(1)).unwrap();
        assert_eq!(store.read_head().unwrap(), oid(1));

        let err = store.compare_and_swap(HEAD, None, oid(2)).unwrap_err();
        assert!(matches!(
            err,
            RefError::StaleReference { expected: None, actual: Some(a), .. } if a == oid(1)
        ));
    }

    #[test]
    fn cas_with_wrong_expectation_leaves_ref() {
        let store = fresh();
        store.update(HEAD, oid(1)).unwrap();
        assert!(store.compare_and_swap(HEAD, Some(oid(9)), oid(2)).is_err());
        assert_eq!(store.read_head().unwrap(), oid(1));

        store.compare_and_swap(HEAD, Some(oid(1)), oid(2)).unwrap();
        assert_eq!(store.read_head().unwrap(), oid(2));
    }

    #[test]
    fn concurrent_cas_has_one_winner() {
        let store = Arc::new(fresh());
        let handles: Vec<_> = (1..=8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.compare_and_swap(HEAD, None, oid(i)).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn symbolic_loop_is_detected() {
        let store = InMemoryRefStore::new();
        store.set_symbolic("refs/heads/a", "refs/heads/b").unwrap();
        store.set_symbolic("refs/heads/b", "refs/heads/a").unwrap();
        assert!(matches!(store.read("refs/heads/a"), Err(RefError::SymbolicLoop(_))));
    }

    #[test]
    fn chain_within_depth_resolves() {
        let store = InMemoryRefStore::new();
        store.update("refs/heads/r0", oid(5)).unwrap();
        for i in 1..=5 {
            store
                .set_symbolic(&format!("refs/heads/r{i}"), &format!("refs/heads/r{}", i - 1))
                .unwrap();
        }
        assert_eq!(store.read("refs/heads/r5").unwrap(), oid(5));

        store.set_symbolic("refs/heads/r6", "refs/heads/r5").unwrap();
        assert!(matches!(store.read("refs/heads/r6"), Err(RefError::SymbolicLoop(_))));
    }

    #[test]
    fn invalid_names_rejected() {
        let store = InMemoryRefStore::new();
        assert!(matches!(store.update("main", oid(1)), Err(RefError::InvalidName { .. })));
        assert!(store.set_symbolic(HEAD, "refs/heads/bad..name").is_err());
    }

    #[test]
    fn list_and_delete() {
        let store = fresh();
        store.update("refs/heads/main", oid(1)).unwrap();
        store.update("refs/heads/dev", oid(2)).unwrap();

        let names: Vec<String> = store
            .list("refs/heads/")
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, ["refs/heads/dev", "refs/heads/main"]);
        assert_eq!(store.list("").unwrap().len(), 3);

        assert!(store.delete("refs/heads/dev").unwrap());
        assert!(!store.delete("refs/heads/dev").unwrap());
        assert!(store.try_read("refs/heads/dev").unwrap().is_none());
    }
}
