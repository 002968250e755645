//! Salt tokens: the attempt counter written in base 94.
//!
//! Digits are the printable ASCII symbols `!` through `~`, most significant
//! first, with no leading zero symbol. Counter 0 therefore encodes to the
//! empty string and the first candidate carries a blank salt line. Tokens
//! grow by one symbol each time the counter passes a power of 94, and
//! ordering by (length, bytes) follows the counter.

use crate::error::SaltError;

/// Number of salt symbols.
pub const BASE: u64 = 94;

/// Salt symbols in digit order.
pub const ALPHABET: &[u8; BASE as usize] =
    b"!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Longest token a `u64` counter can produce (`94^10 > 2^64`).
pub const MAX_LEN: usize = 10;

/// Encode `counter` as a salt token.
pub fn encode(counter: u64) -> String {
    let mut out = String::with_capacity(MAX_LEN);
    encode_into(counter, &mut out);
    out
}

/// Encode `counter` into `out`, replacing its contents.
pub fn encode_into(counter: u64, out: &mut String) {
    out.clear();
    let mut digits = [0u8; MAX_LEN];
    let mut start = MAX_LEN;
    let mut rest = counter;
    while rest > 0 {
        start -= 1;
        digits[start] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }
    for &symbol in &digits[start..] {
        out.push(char::from(symbol));
    }
}

/// Decode a salt token back into its counter.
pub fn decode(token: &str) -> Result<u64, SaltError> {
    if token.as_bytes().first() == Some(&ALPHABET[0]) {
        return Err(SaltError::LeadingZero(token.to_string()));
    }
    token
        .chars()
        .enumerate()
        .try_fold(0u64, |acc, (position, ch)| {
            let digit = symbol_value(ch).ok_or(SaltError::InvalidSymbol { ch, position })?;
            acc.checked_mul(BASE)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| SaltError::Overflow(token.to_string()))
        })
}

fn symbol_value(ch: char) -> Option<u64> {
    match ch {
        '!'..='~' => Some(u64::from(ch) - u64::from(ALPHABET[0])),
        _ => None,
    }
}
