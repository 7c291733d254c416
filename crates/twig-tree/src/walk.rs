//! Read-side traversal of stored trees.

use twig_store::{EntryMode, ObjectStore, TreeEntry};
use twig_types::ObjectId;

use crate::builder::{PathEntry, PathMap};
use crate::error::TreeResult;

/// Expand a stored tree into a flat `path -> entry` mapping.
///
/// Inverse of [`build`](crate::build): `flatten(build(m)) == m` for every
/// mapping `build` accepts.
pub fn flatten(store: &dyn ObjectStore, tree_id: &ObjectId) -> TreeResult<PathMap> {
    let mut out = PathMap::new();
    let mut pending = vec![(String::new(), *tree_id)];
    while let Some((prefix, id)) = pending.pop() {
        let tree = store.get_tree(&id)?;
        for entry in tree.entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };
            if entry.mode == EntryMode::Directory {
                pending.push((path, entry.object_id));
            } else {
                out.insert(path, PathEntry::new(entry.object_id, entry.mode));
            }
        }
    }
    Ok(out)
}

/// Find the entry at a `/`-separated path beneath a tree.
///
/// Returns `Ok(None)` when any component is missing or a file is used as a
/// directory.
pub fn resolve_path(
    store: &dyn ObjectStore,
    tree_id: &ObjectId,
    path: &str,
) -> TreeResult<Option<TreeEntry>> {
    let mut current = *tree_id;
    let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
    while let Some(name) = components.next() {
        let tree = store.get_tree(&current)?;
        let Some(entry) = tree.get(name) else {
            return Ok(None);
        };
        if components.peek().is_none() {
            return Ok(Some(entry.clone()));
        }
        if entry.mode != EntryMode::Directory {
            return Ok(None);
        }
        current = entry.object_id;
    }
    Ok(None)
}
