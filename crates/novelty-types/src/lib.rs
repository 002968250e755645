//! Foundation types for novelty.
//!
//! Every other novelty crate depends on `novelty-types`. It carries the
//! 20-byte object [`Digest`] that patterns are matched against and the
//! [`ValidationError`] taxonomy raised before any search begins.
//!
//! # Key Types
//!
//! - [`Digest`] -- Content-addressed object identifier (git SHA-1)
//! - [`ValidationError`] -- Rejected user input (pattern, cycle, message)
//! - [`TypeError`] -- Malformed digest encodings

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN, DIGEST_NIBBLES};
pub use error::{TypeError, ValidationError};
