use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use twig_history::{CommitChain, LogEntry};
use twig_index::{normalize_path, Index, IndexEntry, IndexError};
use twig_refs::{
    branch_ref, validate_branch_name, FsRefStore, InMemoryRefStore, RefStore, HEAD,
};
use twig_store::{EntryMode, FsObjectStore, InMemoryObjectStore, ObjectStore};
use twig_types::ObjectId;

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::pretty;
use crate::worktree::{DiskWorktree, MemoryWorktree, Worktree};

/// Name of the metadata directory inside an on-disk repository.
pub const METADATA_DIR: &str = ".twig";

const CONFIG_FILE: &str = "config.toml";
const INDEX_FILE: &str = "index";
const OBJECTS_DIR: &str = "objects";

/// Staged changes relative to the `HEAD` commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl Status {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// A Twig repository: object store, refs, staging index and working tree.
pub struct Repository {
    config: RepoConfig,
    store: Arc<dyn ObjectStore>,
    refs: Box<dyn RefStore>,
    index: Index,
    chain: CommitChain,
    worktree: Box<dyn Worktree>,
    /// Where the index is persisted; `None` for in-memory repositories.
    index_path: Option<PathBuf>,
}

impl Repository {
    /// Create a repository that lives entirely in memory.
    pub fn in_memory(config: RepoConfig) -> SdkResult<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new());
        let refs = InMemoryRefStore::new();
        init_head(&refs, &config)?;
        info!(branch = %config.core.default_branch, "initialized in-memory repository");
        let index = Index::new(Arc::clone(&store));
        Ok(Self::assemble(
            config,
            store,
            Box::new(refs),
            index,
            Box::new(MemoryWorktree::new()),
            None,
        ))
    }

    /// Create a new repository with its worktree at `dir`.
    pub fn init(dir: impl AsRef<Path>, config: RepoConfig) -> SdkResult<Self> {
        let dir = dir.as_ref();
        let meta = dir.join(METADATA_DIR);
        if meta.join(HEAD).exists() {
            return Err(SdkError::AlreadyInitialized(dir.to_path_buf()));
        }
        fs::create_dir_all(&meta)?;
        config.save(&meta.join(CONFIG_FILE))?;

        let refs = FsRefStore::open(&meta)?;
        init_head(&refs, &config)?;
        info!(path = %dir.display(), branch = %config.core.default_branch, "initialized repository");
        Self::open_parts(dir, config, refs)
    }

    /// Open an existing on-disk repository.
    pub fn open(dir: impl AsRef<Path>) -> SdkResult<Self> {
        let dir = dir.as_ref();
        let meta = dir.join(METADATA_DIR);
        if !meta.join(HEAD).is_file() {
            return Err(SdkError::NotARepository(dir.to_path_buf()));
        }
        let config = RepoConfig::load(&meta.join(CONFIG_FILE))?;
        let refs = FsRefStore::open(&meta)?;
        Self::open_parts(dir, config, refs)
    }

    fn open_parts(dir: &Path, config: RepoConfig, refs: FsRefStore) -> SdkResult<Self> {
        let meta = dir.join(METADATA_DIR);
        let store: Arc<dyn ObjectStore> = Arc::new(
            FsObjectStore::open(meta.join(OBJECTS_DIR))?
                .with_compression_level(config.core.compression_level),
        );
        let index_path = meta.join(INDEX_FILE);
        let index = Index::load(&index_path, Arc::clone(&store))?;
        Ok(Self::assemble(
            config,
            store,
            Box::new(refs),
            index,
            Box::new(DiskWorktree::new(dir, METADATA_DIR)),
            Some(index_path),
        ))
    }

    fn assemble(
        config: RepoConfig,
        store: Arc<dyn ObjectStore>,
        refs: Box<dyn RefStore>,
        index: Index,
        worktree: Box<dyn Worktree>,
        index_path: Option<PathBuf>,
    ) -> Self {
        let chain = CommitChain::with_policy(Arc::clone(&store), config.commit_policy());
        Self {
            config,
            store,
            refs,
            index,
            chain,
            worktree,
            index_path,
        }
    }

    // ---- Staging ----

    /// Write `content` to the worktree at `path` and stage it.
    pub fn write(&mut self, path: &str, content: &[u8]) -> SdkResult<()> {
        let path = worktree_path(path)?;
        self.worktree.write(&path, content)?;
        self.stage(&path, content)?;
        Ok(())
    }

    /// Stage the worktree's current content at `path`.
    ///
    /// Returns `false` when the path was already staged with that content.
    pub fn add(&mut self, path: &str) -> SdkResult<bool> {
        let path = worktree_path(path)?;
        let content = self
            .worktree
            .read(&path)?
            .ok_or_else(|| SdkError::PathNotFound(path.clone()))?;
        self.stage(&path, &content)
    }

    fn stage(&mut self, path: &str, content: &[u8]) -> SdkResult<bool> {
        let changed = self.index.add(path, content, EntryMode::Regular)?;
        if changed {
            self.save_index()?;
        }
        Ok(changed)
    }

    /// Unstage `path`. The worktree file is left alone.
    pub fn remove(&mut self, path: &str) -> SdkResult<IndexEntry> {
        let removed = self.index.remove(path)?;
        self.save_index()?;
        Ok(removed)
    }

    fn save_index(&self) -> SdkResult<()> {
        if let Some(path) = &self.index_path {
            self.index.save(path)?;
        }
        Ok(())
    }

    // ---- Commits ----

    /// Commit the staged snapshot on top of `HEAD` and advance the branch.
    ///
    /// The branch moves only if it still holds the head observed at the
    /// start; otherwise the commit object stays unreferenced and
    /// [`RefError::StaleReference`](twig_refs::RefError::StaleReference) is
    /// returned.
    pub fn commit(&mut self, message: &str) -> SdkResult<ObjectId> {
        let branch = self.refs.resolve_name(HEAD)?;
        let head = self.refs.try_read(&branch)?;
        let tree = self.index.write_tree()?;
        let signature = self.config.signature()?;

        let id = self.chain.commit(
            tree,
            head.into_iter().collect(),
            message,
            signature.clone(),
            signature,
        )?;
        self.refs.compare_and_swap(&branch, head, id)?;
        info!(branch = %branch, id = %id.short_hex(), "branch advanced");
        Ok(id)
    }

    /// The commit `HEAD` resolves to.
    pub fn read_head(&self) -> SdkResult<ObjectId> {
        Ok(self.refs.read_head()?)
    }

    /// Resolve a ref name (`HEAD`, `refs/heads/main`), a branch name, or a
    /// full hex id.
    pub fn resolve(&self, name: &str) -> SdkResult<ObjectId> {
        if name == HEAD || name.starts_with("refs/") {
            return Ok(self.refs.read(name)?);
        }
        if validate_branch_name(name).is_ok() {
            if let Some(id) = self.refs.try_read(&branch_ref(name))? {
                return Ok(id);
            }
        }
        Ok(ObjectId::from_hex(name)?)
    }

    /// First-parent history from `HEAD`, newest first. Empty while unborn.
    pub fn log(&self, limit: Option<usize>) -> SdkResult<Vec<LogEntry>> {
        match self.refs.try_read(HEAD)? {
            Some(head) => Ok(self.chain.log(head, limit)?),
            None => Ok(Vec::new()),
        }
    }

    // ---- Inspection ----

    pub fn cat_file_p(&self, id: &ObjectId) -> SdkResult<String> {
        Ok(pretty::render(self.store.as_ref(), id)?)
    }

    pub fn cat_file_json(&self, id: &ObjectId) -> SdkResult<Value> {
        Ok(pretty::render_json(self.store.as_ref(), id)?)
    }

    /// Compare the index against the tree of `HEAD`.
    pub fn status(&self) -> SdkResult<Status> {
        let committed = match self.refs.try_read(HEAD)? {
            Some(head) => {
                let tree = self.chain.get(&head)?.tree;
                twig_tree::flatten(self.store.as_ref(), &tree)?
            }
            None => Default::default(),
        };
        let staged = self.index.snapshot();

        let mut status = Status::default();
        for (path, entry) in &staged {
            match committed.get(path) {
                None => status.added.push(path.clone()),
                Some(old) if old != entry => status.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        status.deleted = committed
            .keys()
            .filter(|path| !staged.contains_key(*path))
            .cloned()
            .collect();
        Ok(status)
    }

    /// Reset the index to the tree of `HEAD` (empty while unborn).
    pub fn checkout_index(&mut self) -> SdkResult<()> {
        match self.refs.try_read(HEAD)? {
            Some(head) => {
                let tree = self.chain.get(&head)?.tree;
                self.index.read_tree(&tree)?;
            }
            None => self.index.clear(),
        }
        self.save_index()
    }

    // ---- Accessors ----

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Override the configured identity for commits made through this
    /// handle. The config file is not touched.
    pub fn set_identity(&mut self, name: Option<String>, email: Option<String>) {
        if let Some(name) = name {
            self.config.user.name = name;
        }
        if let Some(email) = email {
            self.config.user.email = email;
        }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn refs(&self) -> &dyn RefStore {
        self.refs.as_ref()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn worktree(&self) -> &dyn Worktree {
        self.worktree.as_ref()
    }

    /// The branch `HEAD` names, if it is symbolic.
    pub fn current_branch(&self) -> SdkResult<Option<String>> {
        Ok(self
            .refs
            .head_target()?
            .map(|name| name.strip_prefix("refs/heads/").unwrap_or(&name).to_string()))
    }
}

/// Normalize a worktree path, refusing anything inside the metadata directory.
fn worktree_path(path: &str) -> SdkResult<String> {
    let path = normalize_path(path)?;
    if path.split('/').next() == Some(METADATA_DIR) {
        return Err(IndexError::InvalidPath {
            path,
            reason: format!("{METADATA_DIR} is reserved for repository metadata"),
        }
        .into());
    }
    Ok(path)
}

fn init_head(refs: &dyn RefStore, config: &RepoConfig) -> SdkResult<()> {
    validate_branch_name(&config.core.default_branch)?;
    refs.set_symbolic(HEAD, &branch_ref(&config.core.default_branch))?;
    Ok(())
}
