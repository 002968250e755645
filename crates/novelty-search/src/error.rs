use std::fmt;

use thiserror::Error;

use novelty_types::ValidationError;

/// The external step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Opening the repository.
    Repository,
    /// Looking up the committer's name and email.
    Identity,
    /// Writing the index out as a tree.
    Tree,
    /// Resolving the current `HEAD`.
    Head,
    /// Hashing a candidate record.
    Digest,
    /// Persisting the winning record.
    Write,
    /// Moving the checkout onto the new commit.
    Checkout,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Repository => "opening repository",
            Self::Identity => "identity lookup",
            Self::Tree => "tree resolution",
            Self::Head => "HEAD resolution",
            Self::Digest => "digest computation",
            Self::Write => "object write",
            Self::Checkout => "checkout reset",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator (object store, repository, checkout).
///
/// These are always fatal: the miner stops and surfaces them unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{stage} failed: {message}")]
pub struct ExternalError {
    pub stage: Stage,
    pub message: String,
}

impl ExternalError {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Result alias for collaborator calls.
pub type ExternalResult<T> = Result<T, ExternalError>;

/// Errors from decoding a salt token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaltError {
    #[error("invalid salt symbol {ch:?} at position {position}")]
    InvalidSymbol { ch: char, position: usize },

    #[error("salt {0:?} has a leading zero symbol")]
    LeadingZero(String),

    #[error("salt {0:?} does not fit in 64 bits")]
    Overflow(String),
}

/// Errors from a mining run.
#[derive(Debug, Error)]
pub enum MineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    External(#[from] ExternalError),

    #[error("no match within {attempts} attempts")]
    LimitReached { attempts: u64 },

    #[error("search cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}
