//! Digest pattern compiler for novelty.
//!
//! A pattern is written by the user as hex digits and describes which nibbles
//! of a 20-byte digest must hold which values. Two forms exist:
//!
//! - **Prefix**: `-p c0ffee` constrains the leading nibbles of the digest.
//! - **Repeat**: `-r ab -c 5` tiles `ab` every 5 nibbles across the whole
//!   digest (`ab...ab...ab...`), leaving the gaps free.
//!
//! A [`PatternSpec`] is compiled once into a [`CompiledPattern`], a fixed
//! `(match, mask)` byte pair. Matching a digest is then a masked comparison of
//! 20 bytes with no further interpretation.
//!
//! ```rust
//! use novelty_pattern::PatternSpec;
//! use novelty_types::Digest;
//!
//! let pattern = PatternSpec::prefix("c0f").compile().unwrap();
//! let mut bytes = [0u8; 20];
//! bytes[0] = 0xc0;
//! bytes[1] = 0xf7;
//! assert!(pattern.matches(&Digest::from_hash(bytes)));
//! ```

pub mod compiled;
pub mod pattern;

pub use compiled::CompiledPattern;
pub use pattern::{PatternSpec, DEFAULT_CYCLE, MAX_CYCLE};
