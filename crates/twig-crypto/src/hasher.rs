use twig_types::ObjectId;

/// Framed BLAKE3 content hasher.
///
/// Each hasher carries a kind tag (`"blob"`, `"tree"`, `"commit"`). The hash
/// covers the frame header `"<tag> <len>\0"` followed by the body, so a blob
/// and a tree with identical bodies never share an id.
pub struct ContentHasher {
    tag: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { tag: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { tag: "tree" };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self { tag: "commit" };

    /// Create a hasher with a custom kind tag.
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    /// The frame header for a body of `len` bytes.
    pub fn header(&self, len: usize) -> Vec<u8> {
        format!("{} {}\0", self.tag, len).into_bytes()
    }

    /// The complete framed encoding: header followed by `body`.
    pub fn frame(&self, body: &[u8]) -> Vec<u8> {
        let mut out = self.header(body.len());
        out.extend_from_slice(body);
        out
    }

    /// Hash a body under this hasher's frame.
    pub fn hash(&self, body: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.header(body.len()));
        hasher.update(body);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that `body` produces the expected object ID.
    pub fn verify(&self, body: &[u8], expected: &ObjectId) -> bool {
        self.hash(body) == *expected
    }

    /// Hash an already-framed byte sequence (header included).
    pub fn hash_framed(framed: &[u8]) -> ObjectId {
        ObjectId::from_hash(*blake3::hash(framed).as_bytes())
    }

    /// The kind tag used by this hasher.
    pub fn tag(&self) -> &str {
        self.tag
    }
}
