//! libgit2 backend for novelty.
//!
//! Implements the repository-facing traits of `novelty-search` on top of a
//! real git repository:
//!
//! - [`GitRepository`] -- snapshot (index tree, `HEAD`, identity, clock),
//!   raw commit writes and the final mixed reset
//! - [`GitObjectHasher`] -- git's object id for a commit record, computed
//!   without touching the repository so every search worker can share it
//!
//! Every libgit2 failure surfaces as an `ExternalError` naming the step that
//! failed.

mod error;
pub mod hasher;
pub mod repository;

pub use hasher::GitObjectHasher;
pub use repository::GitRepository;
