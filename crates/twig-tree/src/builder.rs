use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use twig_store::{validate_entry_name, EntryMode, Object, ObjectStore, Tree, TreeEntry};
use twig_types::ObjectId;

use crate::error::{TreeError, TreeResult};

/// A file-level entry in a flat path mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub object_id: ObjectId,
    pub mode: EntryMode,
}

impl PathEntry {
    pub fn new(object_id: ObjectId, mode: EntryMode) -> Self {
        Self { object_id, mode }
    }

    pub fn regular(object_id: ObjectId) -> Self {
        Self::new(object_id, EntryMode::Regular)
    }
}

/// Flat `path -> entry` mapping with `/`-separated paths.
pub type PathMap = BTreeMap<String, PathEntry>;

/// One directory in the arena. Children always sit at higher indices than
/// their parent.
#[derive(Debug, Default)]
struct DirNode {
    files: BTreeMap<String, PathEntry>,
    dirs: BTreeMap<String, usize>,
}

/// Assembles nested trees from flat paths.
///
/// Entries may be inserted in any order; the resulting tree id depends only
/// on the final set of `(path, entry)` pairs.
pub struct TreeBuilder<'a> {
    store: &'a dyn ObjectStore,
    nodes: Vec<DirNode>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            nodes: vec![DirNode::default()],
        }
    }

    /// Add or replace the file at `path`.
    pub fn insert(&mut self, path: &str, entry: PathEntry) -> TreeResult<()> {
        if entry.mode == EntryMode::Directory {
            return Err(TreeError::DirectoryMode(path.to_string()));
        }
        let components: Vec<&str> = path.split('/').collect();
        for component in &components {
            validate_entry_name(component).map_err(|reason| TreeError::InvalidPath {
                path: path.to_string(),
                reason,
            })?;
        }
        let Some((file, dirs)) = components.split_last() else {
            return Err(TreeError::InvalidPath {
                path: path.to_string(),
                reason: "empty path".into(),
            });
        };

        let mut node = 0;
        for (depth, dir) in dirs.iter().enumerate() {
            if self.nodes[node].files.contains_key(*dir) {
                return Err(TreeError::PathConflict(components[..=depth].join("/")));
            }
            node = match self.nodes[node].dirs.get(*dir) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(DirNode::default());
                    self.nodes[node].dirs.insert((*dir).to_string(), child);
                    child
                }
            };
        }

        if self.nodes[node].dirs.contains_key(*file) {
            return Err(TreeError::PathConflict(path.to_string()));
        }
        self.nodes[node].files.insert((*file).to_string(), entry);
        Ok(())
    }

    /// Persist every directory bottom-up and return the root tree id.
    pub fn write(self) -> TreeResult<ObjectId> {
        let mut ids = vec![ObjectId::null(); self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate().rev() {
            let mut entries: Vec<TreeEntry> = node
                .files
                .iter()
                .map(|(name, e)| TreeEntry::new(e.mode, name.clone(), e.object_id))
                .collect();
            entries.extend(
                node.dirs.iter().map(|(name, &child)| {
                    TreeEntry::new(EntryMode::Directory, name.clone(), ids[child])
                }),
            );
            let tree = Tree::new(entries)?;
            ids[index] = self.store.put(&Object::Tree(tree))?;
        }
        debug!(trees = ids.len(), root = %ids[0].short_hex(), "tree written");
        Ok(ids[0])
    }
}

/// Build and persist the tree for a flat mapping.
pub fn build(store: &dyn ObjectStore, paths: &PathMap) -> TreeResult<ObjectId> {
    let mut builder = TreeBuilder::new(store);
    for (path, entry) in paths {
        builder.insert(path, *entry)?;
    }
    builder.write()
}
