//! Salt search engine for novelty.
//!
//! Mines a commit whose object id satisfies a [`CompiledPattern`]: the commit
//! record is fixed except for a trailing salt line, and the salt is advanced
//! until the record's digest matches.
//!
//! # Pipeline
//!
//! 1. [`salt::encode`] maps the attempt counter to a short printable token.
//! 2. [`CommitTemplate`] renders the candidate record around that token.
//! 3. A [`Digester`] hashes the candidate (git's object hash in production).
//! 4. [`CompiledPattern::matches`] tests the digest; the first match wins.
//!
//! [`Searcher`] runs that loop on one thread or shards it across workers.
//! [`Miner`] wraps it with the repository side: snapshot the repository once,
//! search, write the winning object and move the checkout onto it.
//!
//! # Design Rules
//!
//! 1. All user input is validated before the repository is read or a single
//!    candidate is hashed.
//! 2. The commit template is frozen before any worker starts; every worker
//!    searches the same candidate space.
//! 3. A failed attempt is not an error. External failures are fatal and are
//!    never retried.
//! 4. The searcher never reads ambient configuration: everything arrives as
//!    explicit input.
//!
//! [`CompiledPattern`]: novelty_pattern::CompiledPattern
//! [`CompiledPattern::matches`]: novelty_pattern::CompiledPattern::matches

pub mod cancel;
pub mod config;
pub mod error;
pub mod memory;
pub mod miner;
pub mod progress;
pub mod salt;
pub mod search;
pub mod template;
pub mod traits;

#[cfg(test)]
mod testing;

pub use cancel::CancelToken;
pub use config::SearchConfig;
pub use error::{ExternalError, ExternalResult, MineError, SaltError, Stage};
pub use memory::InMemoryRepository;
pub use miner::{CommitRequest, MinedCommit, Miner};
pub use progress::{ProgressReporter, SilentProgress, TracingProgress};
pub use search::{SearchMatch, SearchOutcome, Searcher};
pub use template::{CommitTemplate, Identity, RepositorySnapshot, Timestamp, SALT_LABEL};
pub use traits::{Checkout, Digester, ObjectWriter, RepositoryState};
