//! The [`RefStore`] trait defining the reference storage interface.

use tracing::debug;
use twig_types::ObjectId;

use crate::error::{RefError, Result};
use crate::types::{Precondition, RefTarget, HEAD, MAX_SYMBOLIC_DEPTH};

/// Storage backend for named references.
///
/// Backends implement the raw primitives; resolution of symbolic refs and
/// the public update operations are provided on top of them. Every name is
/// validated with [`validate_ref_name`](crate::names::validate_ref_name).
pub trait RefStore: Send + Sync {
    /// Read the stored target of `name` without following symbolic refs.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_raw(&self, name: &str) -> Result<Option<RefTarget>>;

    /// Atomically set `name` to the direct value `new` if the current direct
    /// value satisfies `precondition`.
    ///
    /// `name` is written as-is; symbolic refs are not followed.
    fn write_direct(&self, name: &str, precondition: Precondition, new: ObjectId) -> Result<()>;

    /// Make `name` a symbolic ref pointing at `target`.
    fn set_symbolic(&self, name: &str, target: &str) -> Result<()>;

    /// Delete a ref. Returns `Ok(false)` if it did not exist.
    fn delete(&self, name: &str) -> Result<bool>;

    /// All refs whose name starts with `prefix`, sorted by name.
    fn list(&self, prefix: &str) -> Result<Vec<(String, RefTarget)>>;

    /// Follow symbolic refs from `name` to the direct ref they end at.
    ///
    /// The returned name need not exist yet (an unborn branch).
    fn resolve_name(&self, name: &str) -> Result<String> {
        let mut current = name.to_string();
        for hops in 0..=MAX_SYMBOLIC_DEPTH {
            match self.read_raw(&current)? {
                Some(RefTarget::Symbolic(next)) if hops < MAX_SYMBOLIC_DEPTH => current = next,
                Some(RefTarget::Symbolic(_)) => break,
                _ => return Ok(current),
            }
        }
        Err(RefError::SymbolicLoop(name.to_string()))
    }

    /// Resolve `name` to a commit id.
    fn read(&self, name: &str) -> Result<ObjectId> {
        let resolved = self.resolve_name(name)?;
        self.read_raw(&resolved)?
            .and_then(|target| target.as_direct())
            .ok_or_else(|| RefError::UnknownReference(name.to_string()))
    }

    /// Resolve `name` to a commit id, or `None` if it is unset or unborn.
    fn try_read(&self, name: &str) -> Result<Option<ObjectId>> {
        match self.read(name) {
            Ok(id) => Ok(Some(id)),
            Err(RefError::UnknownReference(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Unconditionally point `name` (or the ref it resolves to) at `id`.
    fn update(&self, name: &str, id: ObjectId) -> Result<()> {
        let resolved = self.resolve_name(name)?;
        self.write_direct(&resolved, Precondition::Any, id)?;
        debug!(reference = name, resolved = %resolved, id = %id.short_hex(), "ref updated");
        Ok(())
    }

    /// Point `name` (or the ref it resolves to) at `new` only if it
    /// currently holds `expected` (`None`: does not exist yet).
    fn compare_and_swap(
        &self,
        name: &str,
        expected: Option<ObjectId>,
        new: ObjectId,
    ) -> Result<()> {
        let resolved = self.resolve_name(name)?;
        self.write_direct(&resolved, Precondition::Matches(expected), new)?;
        debug!(reference = name, resolved = %resolved, id = %new.short_hex(), "ref swapped");
        Ok(())
    }

    /// The commit `HEAD` resolves to.
    fn read_head(&self) -> Result<ObjectId> {
        self.read(HEAD)
    }

    /// The ref `HEAD` names, or `None` when `HEAD` is detached or unset.
    fn head_target(&self) -> Result<Option<String>> {
        Ok(match self.read_raw(HEAD)? {
            Some(RefTarget::Symbolic(name)) => Some(name),
            _ => None,
        })
    }
}
