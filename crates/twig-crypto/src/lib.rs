//! Content hashing for Twig.
//!
//! Object identity is the BLAKE3 digest of the object's framed canonical
//! encoding. All crypto operations wrap `blake3`; nothing here is custom.

pub mod hasher;

pub use hasher::ContentHasher;
