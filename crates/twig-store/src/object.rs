use serde::{Deserialize, Serialize};
use twig_crypto::ContentHasher;
use twig_types::{ObjectId, Signature, DIGEST_LEN};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: ordered entries mapping names to object references.
    Tree,
    /// A tree snapshot with ancestry and metadata.
    Commit,
}

impl ObjectKind {
    /// The hasher whose frame tags objects of this kind.
    pub fn hasher(self) -> ContentHasher {
        match self {
            Self::Blob => ContentHasher::BLOB,
            Self::Tree => ContentHasher::TREE,
            Self::Commit => ContentHasher::COMMIT,
        }
    }

    /// Tag used in the frame header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// Parse a frame header tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An undecoded object: kind tag plus canonical body bytes.
///
/// `RawObject` is the unit of storage. Backends persist it without looking
/// inside the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The canonical body bytes (frame header excluded).
    pub body: Vec<u8>,
}

impl RawObject {
    /// Create a raw object from kind and body.
    pub fn new(kind: ObjectKind, body: Vec<u8>) -> Self {
        Self { kind, body }
    }

    /// Compute the content-addressed ID of this object.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.body)
    }

    /// Body size in bytes.
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }

    /// Header followed by body: the exact bytes the digest covers.
    pub fn to_framed(&self) -> Vec<u8> {
        self.kind.hasher().frame(&self.body)
    }

    /// Parse framed bytes (`"<kind> <len>\0<body>"`).
    pub fn from_framed(bytes: &[u8]) -> Result<Self, String> {
        let nul = bytes
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| "missing header terminator".to_string())?;
        let header =
            std::str::from_utf8(&bytes[..nul]).map_err(|_| "header is not UTF-8".to_string())?;
        let (tag, len) = header
            .split_once(' ')
            .ok_or_else(|| format!("header missing size: {header:?}"))?;
        let kind =
            ObjectKind::from_tag(tag).ok_or_else(|| format!("unknown object kind {tag:?}"))?;
        let len: usize = len
            .parse()
            .map_err(|_| format!("invalid size in header: {len:?}"))?;
        let body = &bytes[nul + 1..];
        if body.len() != len {
            return Err(format!(
                "size mismatch: header says {len}, body has {}",
                body.len()
            ));
        }
        Ok(Self::new(kind, body.to_vec()))
    }

    fn expect_kind(&self, expected: ObjectKind) -> StoreResult<()> {
        if self.kind != expected {
            return Err(StoreError::MalformedObject {
                id: self.compute_id(),
                reason: format!("expected {expected}, got {}", self.kind),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object (analogous to git blob).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Content as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    pub fn to_raw(&self) -> RawObject {
        RawObject::new(ObjectKind::Blob, self.data.clone())
    }

    pub fn from_raw(raw: &RawObject) -> StoreResult<Self> {
        raw.expect_kind(ObjectKind::Blob)?;
        Ok(Self {
            data: raw.body.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
}

impl EntryMode {
    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Directory),
            _ => None,
        }
    }

    /// Parse the canonical six-digit octal form used in tree bodies.
    pub fn from_octal_str(s: &str) -> Option<Self> {
        if s.len() != 6 {
            return None;
        }
        u32::from_str_radix(s, 8).ok().and_then(Self::from_mode_bits)
    }

    /// The kind of object an entry with this mode refers to.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            _ => ObjectKind::Blob,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// Check that `name` is usable as a single tree entry name.
pub fn validate_entry_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("entry name must not be empty".into());
    }
    if name == "." || name == ".." {
        return Err(format!("entry name must not be {name:?}"));
    }
    if name.contains(['/', '\0']) {
        return Err(format!("entry name must not contain '/' or NUL: {name:?}"));
    }
    Ok(())
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory).
    pub mode: EntryMode,
    /// Entry name (filename or directory name).
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    /// The kind of object this entry points at.
    pub fn kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Directory listing object (analogous to git tree).
///
/// Invariant: entries are sorted by name and names are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TreeEntry>", into = "Vec<TreeEntry>")]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl TryFrom<Vec<TreeEntry>> for Tree {
    type Error = StoreError;

    fn try_from(entries: Vec<TreeEntry>) -> StoreResult<Self> {
        Self::new(entries)
    }
}

impl From<Tree> for Vec<TreeEntry> {
    fn from(tree: Tree) -> Self {
        tree.entries
    }
}

impl Tree {
    /// Create a tree from entries in any order.
    ///
    /// Entries are sorted by name for deterministic hashing. Invalid or
    /// duplicate names are rejected.
    pub fn new(mut entries: Vec<TreeEntry>) -> StoreResult<Self> {
        for entry in &entries {
            validate_entry_name(&entry.name).map_err(StoreError::InvalidTree)?;
        }
        entries.sort();
        if let Some(pair) = entries.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(StoreError::InvalidTree(format!(
                "duplicate entry name: {:?}",
                pair[0].name
            )));
        }
        Ok(Self { entries })
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries in name order.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical body: `"<mode> <name>\0<32-byte id>"` per entry, in order.
    pub fn encode_body(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.entries.len() * (DIGEST_LEN + 16));
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.to_string().as_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.name.as_bytes());
            out.push(0);
            out.extend_from_slice(entry.object_id.as_bytes());
        }
        out
    }

    pub fn to_raw(&self) -> RawObject {
        RawObject::new(ObjectKind::Tree, self.encode_body())
    }

    pub fn from_raw(raw: &RawObject) -> StoreResult<Self> {
        raw.expect_kind(ObjectKind::Tree)?;
        let id = raw.compute_id();
        let malformed = |reason: String| StoreError::MalformedObject { id, reason };

        let body = &raw.body;
        let mut entries: Vec<TreeEntry> = Vec::new();
        let mut pos = 0;
        while pos < body.len() {
            let space = body[pos..]
                .iter()
                .position(|&b| b == b' ')
                .map(|i| pos + i)
                .ok_or_else(|| malformed("entry missing mode separator".into()))?;
            let mode_str = std::str::from_utf8(&body[pos..space])
                .map_err(|_| malformed("entry mode is not UTF-8".into()))?;
            let mode = EntryMode::from_octal_str(mode_str)
                .ok_or_else(|| malformed(format!("unknown entry mode {mode_str:?}")))?;

            let nul = body[space + 1..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| space + 1 + i)
                .ok_or_else(|| malformed("entry name is not terminated".into()))?;
            let name = std::str::from_utf8(&body[space + 1..nul])
                .map_err(|_| malformed("entry name is not UTF-8".into()))?
                .to_string();
            validate_entry_name(&name).map_err(malformed)?;

            let start = nul + 1;
            let end = start + DIGEST_LEN;
            if end > body.len() {
                return Err(malformed(format!("truncated digest for entry {name:?}")));
            }
            let object_id = ObjectId::from_slice(&body[start..end])
                .map_err(|e| malformed(e.to_string()))?;

            if let Some(prev) = entries.last() {
                if prev.name.as_str() >= name.as_str() {
                    return Err(malformed(format!(
                        "entries out of order or duplicated at {name:?}"
                    )));
                }
            }
            entries.push(TreeEntry {
                mode,
                name,
                object_id,
            });
            pos = end;
        }
        Ok(Self { entries })
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A snapshot of a tree plus its ancestry and metadata.
///
/// Canonical body:
///
/// ```text
/// tree <hex>
/// parent <hex>          (zero or more)
/// author <signature>
/// committer <signature>
///
/// <message>
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Parent commits, in order.
    pub parents: Vec<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

impl Commit {
    pub fn new(
        tree: ObjectId,
        parents: Vec<ObjectId>,
        author: Signature,
        committer: Signature,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            parents,
            author,
            committer,
            message: message.into(),
        }
    }

    /// Returns `true` if the commit has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn encode_body(&self) -> Vec<u8> {
        let mut out = format!("tree {}\n", self.tree);
        for parent in &self.parents {
            out.push_str(&format!("parent {parent}\n"));
        }
        out.push_str(&format!("author {}\n", self.author));
        out.push_str(&format!("committer {}\n", self.committer));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }

    pub fn to_raw(&self) -> RawObject {
        RawObject::new(ObjectKind::Commit, self.encode_body())
    }

    pub fn from_raw(raw: &RawObject) -> StoreResult<Self> {
        raw.expect_kind(ObjectKind::Commit)?;
        let id = raw.compute_id();
        let malformed = |reason: String| StoreError::MalformedObject { id, reason };

        let text = std::str::from_utf8(&raw.body)
            .map_err(|_| malformed("commit is not UTF-8".into()))?;
        let (headers, message) = text
            .split_once("\n\n")
            .ok_or_else(|| malformed("commit has no header terminator".into()))?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;

        for line in headers.split('\n') {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| malformed(format!("bad header line {line:?}")))?;
            let parse_id = |v: &str| ObjectId::from_hex(v).map_err(|e| malformed(e.to_string()));
            let parse_sig =
                |v: &str| v.parse::<Signature>().map_err(|e| malformed(e.to_string()));
            match key {
                "tree" if tree.is_none() => tree = Some(parse_id(value)?),
                "parent" if tree.is_some() && author.is_none() => parents.push(parse_id(value)?),
                "author" if tree.is_some() && author.is_none() => author = Some(parse_sig(value)?),
                "committer" if author.is_some() && committer.is_none() => {
                    committer = Some(parse_sig(value)?)
                }
                _ => return Err(malformed(format!("unexpected header line {line:?}"))),
            }
        }

        let commit = Self {
            tree: tree.ok_or_else(|| malformed("missing tree header".into()))?,
            parents,
            author: author.ok_or_else(|| malformed("missing author header".into()))?,
            committer: committer.ok_or_else(|| malformed("missing committer header".into()))?,
            message: message.to_string(),
        };
        if commit.encode_body() != raw.body {
            return Err(malformed("non-canonical commit encoding".into()));
        }
        Ok(commit)
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Any decoded object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }

    pub fn to_raw(&self) -> RawObject {
        match self {
            Self::Blob(b) => b.to_raw(),
            Self::Tree(t) => t.to_raw(),
            Self::Commit(c) => c.to_raw(),
        }
    }

    /// The content-addressed ID this object would be stored under.
    pub fn id(&self) -> ObjectId {
        self.to_raw().compute_id()
    }

    /// Decode a raw object according to its kind tag.
    pub fn from_raw(raw: &RawObject) -> StoreResult<Self> {
        Ok(match raw.kind {
            ObjectKind::Blob => Self::Blob(Blob::from_raw(raw)?),
            ObjectKind::Tree => Self::Tree(Tree::from_raw(raw)?),
            ObjectKind::Commit => Self::Commit(Commit::from_raw(raw)?),
        })
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(when: i64) -> Signature {
        Signature::new("Test Author", "author@example.com", when, 0).unwrap()
    }

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_hash([n; 32])
    }

    #[test]
    fn tree_serde_keeps_invariants() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "b.txt", oid(2)),
            TreeEntry::new(EntryMode::Regular, "a.txt", oid(1)),
        ])
        .unwrap();
        let mut value = serde_json::to_value(&tree).unwrap();
        let back: Tree = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, tree);

        value[1]["name"] = value[0]["name"].clone();
        assert!(serde_json::from_value::<Tree>(value).is_err());
    }

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new(b"hello world".to_vec());
        let decoded = Blob::from_raw(&blob.to_raw()).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let raw = RawObject::new(ObjectKind::Tree, Vec::new());
        let err = Blob::from_raw(&raw).unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject { .. }));
    }

    #[test]
    fn tree_entries_sorted() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "zebra.txt", oid(1)),
            TreeEntry::new(EntryMode::Regular, "alpha.txt", oid(2)),
            TreeEntry::new(EntryMode::Directory, "middle", oid(3)),
        ])
        .unwrap();
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha.txt", "middle", "zebra.txt"]);
    }

    #[test]
    fn tree_rejects_duplicate_names() {
        let err = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "same", oid(1)),
            TreeEntry::new(EntryMode::Directory, "same", oid(2)),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTree(_)));
    }

    #[test]
    fn tree_rejects_bad_names() {
        for bad in ["", ".", "..", "a/b", "nul\0"] {
            let result = Tree::new(vec![TreeEntry::new(EntryMode::Regular, bad, oid(1))]);
            assert!(result.is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn tree_roundtrip() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "file.txt", oid(1)),
            TreeEntry::new(EntryMode::Executable, "run.sh", oid(2)),
            TreeEntry::new(EntryMode::Directory, "subdir", oid(3)),
        ])
        .unwrap();
        let decoded = Tree::from_raw(&tree.to_raw()).unwrap();
        assert_eq!(tree, decoded);
    }

    #[test]
    fn tree_body_layout() {
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "a", oid(0xaa))]).unwrap();
        let body = tree.encode_body();
        assert!(body.starts_with(b"100644 a\0"));
        assert_eq!(body.len(), b"100644 a\0".len() + 32);
    }

    #[test]
    fn tree_decode_rejects_unsorted_body() {
        let mut body = Vec::new();
        for name in ["b", "a"] {
            body.extend_from_slice(format!("100644 {name}\0").as_bytes());
            body.extend_from_slice(&[1u8; 32]);
        }
        let err = Tree::from_raw(&RawObject::new(ObjectKind::Tree, body)).unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject { .. }));
    }

    #[test]
    fn tree_decode_rejects_truncated_digest() {
        let mut body = b"100644 a\0".to_vec();
        body.extend_from_slice(&[1u8; 10]);
        let err = Tree::from_raw(&RawObject::new(ObjectKind::Tree, body)).unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject { .. }));
    }

    #[test]
    fn tree_get_entry() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "a.txt", oid(1)),
            TreeEntry::new(EntryMode::Regular, "b.txt", oid(2)),
        ])
        .unwrap();
        assert_eq!(tree.get("b.txt").unwrap().object_id, oid(2));
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        assert!(tree.encode_body().is_empty());
    }

    #[test]
    fn entry_mode_octal_forms() {
        assert_eq!(EntryMode::Directory.to_string(), "040000");
        assert_eq!(EntryMode::from_octal_str("100755"), Some(EntryMode::Executable));
        assert_eq!(EntryMode::from_octal_str("40000"), None);
        assert_eq!(EntryMode::from_octal_str("100777"), None);
    }

    #[test]
    fn commit_roundtrip_with_parents() {
        let commit = Commit::new(oid(1), vec![oid(2), oid(3)], sig(10), sig(20), "merge\n\nbody");
        let decoded = Commit::from_raw(&commit.to_raw()).unwrap();
        assert_eq!(commit, decoded);
        assert_eq!(decoded.summary(), "merge");
    }

    #[test]
    fn commit_body_layout() {
        let commit = Commit::new(oid(1), vec![], sig(5), sig(5), "msg");
        let text = String::from_utf8(commit.encode_body()).unwrap();
        let expected = format!(
            "tree {}\nauthor Test Author <author@example.com> 5 +0000\n\
             committer Test Author <author@example.com> 5 +0000\n\nmsg",
            oid(1)
        );
        assert_eq!(text, expected);
        assert!(commit.is_root());
    }

    #[test]
    fn commit_with_empty_message_roundtrips() {
        let commit = Commit::new(oid(1), vec![], sig(1), sig(1), "");
        assert_eq!(Commit::from_raw(&commit.to_raw()).unwrap(), commit);
    }

    #[test]
    fn commit_decode_rejects_missing_tree() {
        let body = b"author A <a@b> 1 +0000\ncommitter A <a@b> 1 +0000\n\nmsg".to_vec();
        let err = Commit::from_raw(&RawObject::new(ObjectKind::Commit, body)).unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject { .. }));
    }

    #[test]
    fn commit_decode_rejects_uppercase_hex() {
        let commit = Commit::new(oid(0xab), vec![], sig(1), sig(1), "m");
        let text = String::from_utf8(commit.encode_body()).unwrap();
        let shouted = text.replacen(&oid(0xab).to_hex(), &oid(0xab).to_hex().to_uppercase(), 1);
        let raw = RawObject::new(ObjectKind::Commit, shouted.into_bytes());
        let err = Commit::from_raw(&raw).unwrap_err();
        assert!(matches!(err, StoreError::MalformedObject { .. }));
    }

    #[test]
    fn framed_roundtrip_and_size_check() {
        let raw = Blob::new(b"abc".to_vec()).to_raw();
        let framed = raw.to_framed();
        assert_eq!(framed, b"blob 3\0abc".to_vec());
        assert_eq!(RawObject::from_framed(&framed).unwrap(), raw);
        assert!(RawObject::from_framed(b"blob 4\0abc").is_err());
        assert!(RawObject::from_framed(b"sock 3\0abc").is_err());
        assert!(RawObject::from_framed(b"blob 3abc").is_err());
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let blob = RawObject::new(ObjectKind::Blob, Vec::new());
        let tree = RawObject::new(ObjectKind::Tree, Vec::new());
        assert_ne!(blob.compute_id(), tree.compute_id());
    }

    #[test]
    fn object_dispatches_on_kind() {
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "f", oid(1))]).unwrap();
        let obj = Object::from(tree.clone());
        assert_eq!(obj.kind(), ObjectKind::Tree);
        assert_eq!(Object::from_raw(&obj.to_raw()).unwrap(), Object::Tree(tree));
        assert_eq!(obj.id(), obj.to_raw().compute_id());
    }

    #[test]
    fn object_kind_display() {
        assert_eq!(ObjectKind::Blob.to_string(), "blob");
        assert_eq!(ObjectKind::Tree.to_string(), "tree");
        assert_eq!(ObjectKind::Commit.to_string(), "commit");
    }
}
