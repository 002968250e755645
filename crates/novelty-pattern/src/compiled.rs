use std::fmt;

use serde::{Deserialize, Serialize};

use novelty_types::{Digest, DIGEST_LEN, DIGEST_NIBBLES};

/// A compiled digest pattern: the bits a digest must carry, and which bits
/// are constrained at all.
///
/// Invariant: `match_bytes[i] & !mask_bytes[i] == 0` for every byte. Bits the
/// pattern does not constrain are zero in both arrays.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompiledPattern {
    match_bytes: [u8; DIGEST_LEN],
    mask_bytes: [u8; DIGEST_LEN],
}

impl CompiledPattern {
    /// Build a pattern from raw arrays. Match bits outside the mask are
    /// cleared.
    pub fn new(match_bytes: [u8; DIGEST_LEN], mask_bytes: [u8; DIGEST_LEN]) -> Self {
        let mut cleared = match_bytes;
        for (byte, mask) in cleared.iter_mut().zip(mask_bytes.iter()) {
            *byte &= mask;
        }
        Self {
            match_bytes: cleared,
            mask_bytes,
        }
    }

    /// The required bit values.
    pub fn match_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.match_bytes
    }

    /// The constrained bits.
    pub fn mask_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.mask_bytes
    }

    /// Returns `true` if `digest` carries every constrained bit.
    pub fn matches(&self, digest: &Digest) -> bool {
        self.matches_bytes(digest.as_bytes())
    }

    /// Masked comparison of raw digest bytes, stopping at the first
    /// mismatching byte.
    pub fn matches_bytes(&self, digest: &[u8; DIGEST_LEN]) -> bool {
        digest
            .iter()
            .zip(self.mask_bytes.iter().zip(self.match_bytes.iter()))
            .all(|(byte, (mask, want))| byte & mask == *want)
    }

    /// Number of constrained bits.
    pub fn constrained_bits(&self) -> u32 {
        self.mask_bytes.iter().map(|m| m.count_ones()).sum()
    }

    /// Expected number of candidates before a uniformly distributed digest
    /// matches: `2^constrained_bits`.
    pub fn expected_attempts(&self) -> f64 {
        2f64.powi(self.constrained_bits() as i32)
    }

    /// The required value of nibble `position`, or `None` if it is free.
    ///
    /// Patterns compiled from hex digits always constrain whole nibbles.
    pub fn nibble(&self, position: usize) -> Option<u8> {
        if position >= DIGEST_NIBBLES {
            return None;
        }
        let shift = if position % 2 == 0 { 4 } else { 0 };
        let byte = position / 2;
        if (self.mask_bytes[byte] >> shift) & 0x0f == 0 {
            return None;
        }
        Some((self.match_bytes[byte] >> shift) & 0x0f)
    }

    /// 40-character rendering with `.` for free nibbles.
    pub fn describe(&self) -> String {
        (0..DIGEST_NIBBLES)
            .map(|position| match self.nibble(position) {
                Some(value) => char::from_digit(u32::from(value), 16).unwrap_or('?'),
                None => '.',
            })
            .collect()
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledPattern({})", self.describe())
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatternSpec;
    use proptest::prelude::*;

    fn digest_with(prefix: &[u8]) -> Digest {
        let mut bytes = [0x5a; DIGEST_LEN];
        bytes[..prefix.len()].copy_from_slice(prefix);
        Digest::from_hash(bytes)
    }

    #[test]
    fn new_clears_unmasked_match_bits() {
        let p = CompiledPattern::new([0xff; DIGEST_LEN], [0xf0; DIGEST_LEN]);
        assert!(p.match_bytes().iter().all(|&b| b == 0xf0));
    }

    #[test]
    fn prefix_matches_and_rejects() {
        let p = PatternSpec::prefix("c0ffe").compile().unwrap();
        assert!(p.matches(&digest_with(&[0xc0, 0xff, 0xe3])));
        assert!(!p.matches(&digest_with(&[0xc0, 0xff, 0xf3])));
        assert!(!p.matches(&digest_with(&[0xc1, 0xff, 0xe3])));
    }

    #[test]
    fn empty_mask_matches_everything() {
        let p = CompiledPattern::new([0; DIGEST_LEN], [0; DIGEST_LEN]);
        assert!(p.matches(&Digest::from_hash([0xab; DIGEST_LEN])));
        assert_eq!(p.constrained_bits(), 0);
        assert_eq!(p.expected_attempts(), 1.0);
    }

    #[test]
    fn zero_prefix_two_digits() {
        let p = PatternSpec::prefix("00").compile().unwrap();
        assert_eq!(p.match_bytes()[0], 0x00);
        assert_eq!(p.mask_bytes()[0], 0xff);
        assert!(p.mask_bytes()[1..].iter().all(|&m| m == 0));
        assert_eq!(p.expected_attempts(), 256.0);
    }

    #[test]
    fn nibble_out_of_range_is_free() {
        let p = PatternSpec::repeat("1", 1).compile().unwrap();
        assert_eq!(p.nibble(39), Some(1));
        assert_eq!(p.nibble(40), None);
    }

    #[test]
    fn display_uses_describe() {
        let p = PatternSpec::prefix("dead").compile().unwrap();
        assert_eq!(format!("{p}"), format!("dead{}", ".".repeat(36)));
    }

    fn any_pattern() -> impl Strategy<Value = CompiledPattern> {
        (
            proptest::array::uniform20(any::<u8>()),
            proptest::array::uniform20(any::<u8>()),
        )
            .prop_map(|(m, k)| CompiledPattern::new(m, k))
    }

    proptest! {
        #[test]
        fn matches_is_masked_equality(p in any_pattern(), d in proptest::array::uniform20(any::<u8>())) {
            let expected = (0..DIGEST_LEN).all(|i| d[i] & p.mask_bytes()[i] == p.match_bytes()[i]);
            prop_assert_eq!(p.matches_bytes(&d), expected);
        }

        #[test]
        fn free_bits_never_matter(p in any_pattern(), d in proptest::array::uniform20(any::<u8>()), bit in 0usize..160) {
            let byte = bit / 8;
            let flag = 1u8 << (bit % 8);
            prop_assume!(p.mask_bytes()[byte] & flag == 0);
            let mut flipped = d;
            flipped[byte] ^= flag;
            prop_assert_eq!(p.matches_bytes(&d), p.matches_bytes(&flipped));
        }

        #[test]
        fn constrained_bits_always_matter(p in any_pattern(), bit in 0usize..160) {
            let byte = bit / 8;
            let flag = 1u8 << (bit % 8);
            prop_assume!(p.mask_bytes()[byte] & flag != 0);
            let matching = *p.match_bytes();
            prop_assert!(p.matches_bytes(&matching));
            let mut flipped = matching;
            flipped[byte] ^= flag;
            prop_assert!(!p.matches_bytes(&flipped));
        }
    }
}
