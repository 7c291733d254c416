//! Foundation types for Twig.
//!
//! Every other Twig crate depends on `twig-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 digest)
//! - [`Signature`] -- Author/committer identity with a timestamp

pub mod error;
pub mod object;
pub mod signature;

pub use error::TypeError;
pub use object::{ObjectId, DIGEST_LEN};
pub use signature::Signature;
