use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Rejected user input.
///
/// All of these are detected before the search starts: no repository is read
/// and no candidate is hashed once one of them has been raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("prefix or repeat pattern is required")]
    MissingPattern,

    #[error("prefix and repeat patterns are mutually exclusive")]
    ConflictingModes,

    #[error("pattern {pattern:?} is too long: {len} digits, must be fewer than 40")]
    PatternTooLong { pattern: String, len: usize },

    #[error("illegal character {ch:?} at position {position} in pattern {pattern:?}")]
    InvalidPatternCharacter {
        pattern: String,
        ch: char,
        position: usize,
    },

    #[error("cycle must be between 1 and 39 (inclusive), got {0}")]
    InvalidCycle(u32),

    #[error("commit message is required")]
    EmptyMessage,
}
