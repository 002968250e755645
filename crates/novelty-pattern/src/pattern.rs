//! Pattern specifications and their compilation into match/mask pairs.
//!
//! Hex digits are read left to right, most-significant nibble first, so digit
//! `i` lands in byte `i / 2`: even positions constrain the high nibble
//! (`0xF0`), odd positions the low nibble (`0x0F`).

use serde::{Deserialize, Serialize};

use novelty_types::{ValidationError, DIGEST_LEN, DIGEST_NIBBLES};

use crate::compiled::CompiledPattern;

/// Cycle length used when repeat mode is selected without an explicit cycle.
pub const DEFAULT_CYCLE: u32 = 5;

/// Largest accepted cycle length. A cycle spanning the whole digest would not
/// repeat at all.
pub const MAX_CYCLE: u32 = DIGEST_NIBBLES as u32 - 1;

/// A user-supplied digest pattern, prior to compilation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSpec {
    /// Constrain the leading nibbles of the digest.
    Prefix(String),
    /// Tile `digits` across the digest every `cycle` nibbles.
    Repeat { digits: String, cycle: u32 },
}

impl PatternSpec {
    /// A prefix pattern.
    pub fn prefix(digits: impl Into<String>) -> Self {
        Self::Prefix(digits.into())
    }

    /// A repeat pattern with the given cycle length.
    pub fn repeat(digits: impl Into<String>, cycle: u32) -> Self {
        Self::Repeat {
            digits: digits.into(),
            cycle,
        }
    }

    /// Build a pattern from raw command-line inputs.
    ///
    /// Empty strings count as "not supplied". Supplying both a prefix and a
    /// repeat pattern is always a conflict, whatever their contents; the cycle
    /// is only checked when repeat mode is selected.
    pub fn resolve(
        prefix: Option<&str>,
        repeat: Option<&str>,
        cycle: u32,
    ) -> Result<Self, ValidationError> {
        let prefix = prefix.filter(|s| !s.is_empty());
        let repeat = repeat.filter(|s| !s.is_empty());
        match (prefix, repeat) {
            (Some(_), Some(_)) => Err(ValidationError::ConflictingModes),
            (None, None) => Err(ValidationError::MissingPattern),
            (Some(p), None) => Ok(Self::prefix(p)),
            (None, Some(r)) => {
                check_cycle(cycle)?;
                Ok(Self::repeat(r, cycle))
            }
        }
    }

    /// The hex digits of this pattern.
    pub fn digits(&self) -> &str {
        match self {
            Self::Prefix(digits) | Self::Repeat { digits, .. } => digits,
        }
    }

    /// Compile into a fixed match/mask pair.
    pub fn compile(&self) -> Result<CompiledPattern, ValidationError> {
        if let Self::Repeat { cycle, .. } = self {
            check_cycle(*cycle)?;
        }
        let nibbles = parse_digits(self.digits())?;

        let mut match_bytes = [0u8; DIGEST_LEN];
        let mut mask_bytes = [0u8; DIGEST_LEN];
        match self {
            Self::Prefix(_) => {
                for (position, &value) in nibbles.iter().enumerate() {
                    set_nibble(&mut match_bytes, &mut mask_bytes, position, value);
                }
            }
            Self::Repeat { cycle, .. } => {
                let cycle = *cycle as usize;
                for position in 0..DIGEST_NIBBLES {
                    // Positions past the end of the repeat string stay free.
                    if let Some(&value) = nibbles.get(position % cycle) {
                        set_nibble(&mut match_bytes, &mut mask_bytes, position, value);
                    }
                }
            }
        }
        Ok(CompiledPattern::new(match_bytes, mask_bytes))
    }
}

fn check_cycle(cycle: u32) -> Result<(), ValidationError> {
    if (1..=MAX_CYCLE).contains(&cycle) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCycle(cycle))
    }
}

/// Validate a hex digit string and return its nibble values.
fn parse_digits(digits: &str) -> Result<Vec<u8>, ValidationError> {
    let len = digits.chars().count();
    if len == 0 {
        return Err(ValidationError::MissingPattern);
    }
    if len >= DIGEST_NIBBLES {
        return Err(ValidationError::PatternTooLong {
            pattern: digits.to_string(),
            len,
        });
    }
    digits
        .chars()
        .enumerate()
        .map(|(position, ch)| {
            nibble_value(ch).ok_or_else(|| ValidationError::InvalidPatternCharacter {
                pattern: digits.to_string(),
                ch,
                position,
            })
        })
        .collect()
}

/// Lowercase hex only; digests are always printed in lowercase.
fn nibble_value(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'a'..='f' => Some(ch as u8 - b'a' + 10),
        _ => None,
    }
}

fn set_nibble(
    match_bytes: &mut [u8; DIGEST_LEN],
    mask_bytes: &mut [u8; DIGEST_LEN],
    position: usize,
    value: u8,
) {
    let shift = if position % 2 == 0 { 4 } else { 0 };
    let byte = position / 2;
    match_bytes[byte] = (match_bytes[byte] & !(0x0f << shift)) | (value << shift);
    mask_bytes[byte] |= 0x0f << shift;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Resolution of raw inputs
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_prefix() {
        let spec = PatternSpec::resolve(Some("abc"), None, DEFAULT_CYCLE).unwrap();
        assert_eq!(spec, PatternSpec::prefix("abc"));
    }

    #[test]
    fn resolve_repeat() {
        let spec = PatternSpec::resolve(None, Some("ab"), 7).unwrap();
        assert_eq!(spec, PatternSpec::repeat("ab", 7));
    }

    #[test]
    fn resolve_requires_a_pattern() {
        assert_eq!(
            PatternSpec::resolve(None, None, DEFAULT_CYCLE),
            Err(ValidationError::MissingPattern)
        );
        assert_eq!(
            PatternSpec::resolve(Some(""), Some(""), DEFAULT_CYCLE),
            Err(ValidationError::MissingPattern)
        );
    }

    #[test]
    fn resolve_rejects_both_modes_even_when_invalid() {
        assert_eq!(
            PatternSpec::resolve(Some("zz"), Some("ab"), 0),
            Err(ValidationError::ConflictingModes)
        );
        assert_eq!(
            PatternSpec::resolve(Some(&"a".repeat(50)), Some("ab"), 5),
            Err(ValidationError::ConflictingModes)
        );
    }

    #[test]
    fn resolve_checks_cycle_only_in_repeat_mode() {
        assert_eq!(
            PatternSpec::resolve(None, Some("ab"), 0),
            Err(ValidationError::InvalidCycle(0))
        );
        assert_eq!(
            PatternSpec::resolve(None, Some("ab"), 40),
            Err(ValidationError::InvalidCycle(40))
        );
        assert!(PatternSpec::resolve(Some("ab"), None, 0).is_ok());
    }

    // -----------------------------------------------------------------------
    // Prefix compilation
    // -----------------------------------------------------------------------

    #[test]
    fn prefix_even_length() {
        let p = PatternSpec::prefix("c0ffee").compile().unwrap();
        assert_eq!(&p.match_bytes()[..4], &[0xc0, 0xff, 0xee, 0x00]);
        assert_eq!(&p.mask_bytes()[..4], &[0xff, 0xff, 0xff, 0x00]);
        assert!(p.mask_bytes()[3..].iter().all(|&m| m == 0));
    }

    #[test]
    fn prefix_odd_length_constrains_high_nibble() {
        let p = PatternSpec::prefix("abc").compile().unwrap();
        assert_eq!(&p.match_bytes()[..2], &[0xab, 0xc0]);
        assert_eq!(&p.mask_bytes()[..2], &[0xff, 0xf0]);
    }

    #[test]
    fn prefix_of_39_digits_is_accepted() {
        let p = PatternSpec::prefix("f".repeat(39)).compile().unwrap();
        assert_eq!(p.mask_bytes()[19], 0xf0);
        assert_eq!(p.constrained_bits(), 39 * 4);
    }

    #[test]
    fn prefix_of_40_digits_is_too_long() {
        let err = PatternSpec::prefix("0".repeat(40)).compile().unwrap_err();
        assert!(matches!(err, ValidationError::PatternTooLong { len: 40, .. }));
    }

    #[test]
    fn length_is_checked_before_characters() {
        let err = PatternSpec::prefix("z".repeat(45)).compile().unwrap_err();
        assert!(matches!(err, ValidationError::PatternTooLong { len: 45, .. }));
    }

    #[test]
    fn invalid_character_reports_position() {
        let err = PatternSpec::prefix("abXd").compile().unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidPatternCharacter {
                pattern: "abXd".into(),
                ch: 'X',
                position: 2,
            }
        );
    }

    #[test]
    fn uppercase_hex_is_rejected() {
        assert!(PatternSpec::prefix("AB").compile().is_err());
    }

    #[test]
    fn empty_digits_are_missing() {
        assert_eq!(
            PatternSpec::prefix("").compile(),
            Err(ValidationError::MissingPattern)
        );
    }

    // -----------------------------------------------------------------------
    // Repeat compilation
    // -----------------------------------------------------------------------

    #[test]
    fn repeat_ab_cycle_5() {
        let p = PatternSpec::repeat("ab", 5).compile().unwrap();
        assert_eq!(p.describe(), "ab...ab...ab...ab...ab...ab...ab...ab...");
        assert_eq!(p.constrained_bits(), 16 * 4);
    }

    #[test]
    fn repeat_full_cycle_has_no_gaps() {
        let p = PatternSpec::repeat("0", 1).compile().unwrap();
        assert!(p.mask_bytes().iter().all(|&m| m == 0xff));
        assert!(p.match_bytes().iter().all(|&m| m == 0x00));
    }

    #[test]
    fn repeat_longer_than_cycle_uses_leading_digits() {
        let p = PatternSpec::repeat("abcd", 2).compile().unwrap();
        assert_eq!(p.describe(), "ab".repeat(20));
    }

    #[test]
    fn repeat_odd_cycle_alternates_nibble_halves() {
        let p = PatternSpec::repeat("7", 3).compile().unwrap();
        // positions 0, 3, 6, ... -> high, low, high nibble
        assert_eq!(p.mask_bytes()[0], 0xf0);
        assert_eq!(p.mask_bytes()[1], 0x0f);
        assert_eq!(p.match_bytes()[1], 0x07);
        assert_eq!(p.mask_bytes()[2], 0x00);
        assert_eq!(p.mask_bytes()[3], 0xf0);
    }

    #[test]
    fn repeat_cycle_bounds() {
        assert!(PatternSpec::repeat("a", 39).compile().is_ok());
        assert_eq!(
            PatternSpec::repeat("a", 0).compile(),
            Err(ValidationError::InvalidCycle(0))
        );
        assert_eq!(
            PatternSpec::repeat("a", 40).compile(),
            Err(ValidationError::InvalidCycle(40))
        );
    }

    fn hex_string(range: std::ops::Range<usize>) -> impl Strategy<Value = String> {
        proptest::collection::vec(
            proptest::sample::select(b"0123456789abcdef".to_vec()),
            range,
        )
        .prop_map(|v| String::from_utf8(v).unwrap())
    }

    proptest! {
        #[test]
        fn prefix_reads_back(s in hex_string(1..40)) {
            let p = PatternSpec::prefix(s.clone()).compile().unwrap();
            let read: String = p.describe().chars().take_while(|&c| c != '.').collect();
            prop_assert_eq!(&read, &s);
            for (byte, &mask) in p.mask_bytes().iter().enumerate() {
                let expected = match s.len().saturating_sub(byte * 2) {
                    0 => 0x00,
                    1 => 0xf0,
                    _ => 0xff,
                };
                prop_assert_eq!(mask, expected);
            }
        }

        #[test]
        fn repeat_tiles_across_digest(cycle in 1u32..=39, seed in hex_string(1..40)) {
            let len = seed.len().min(cycle as usize);
            let digits = &seed[..len];
            let p = PatternSpec::repeat(digits, cycle).compile().unwrap();
            for i in 0..DIGEST_NIBBLES {
                let j = i % cycle as usize;
                if j < digits.len() {
                    let expected = u8::from_str_radix(&digits[j..=j], 16).unwrap();
                    prop_assert_eq!(p.nibble(i), Some(expected));
                } else {
                    prop_assert_eq!(p.nibble(i), None);
                }
            }
        }

        #[test]
        fn both_modes_always_conflict(a in hex_string(1..60), b in hex_string(1..60), cycle in 0u32..100) {
            prop_assert_eq!(
                PatternSpec::resolve(Some(&a), Some(&b), cycle),
                Err(ValidationError::ConflictingModes)
            );
        }
    }
}
