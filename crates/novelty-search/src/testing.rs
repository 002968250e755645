//! Fixtures shared by the unit tests of this crate.

use std::sync::atomic::{AtomicU64, Ordering};

use novelty_types::{Digest, DIGEST_LEN};

use crate::error::ExternalResult;
use crate::salt;
use crate::template::{Identity, RepositorySnapshot, Timestamp, SALT_LABEL};
use crate::traits::Digester;

pub const TREE_HEX: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
pub const PARENT_HEX: &str = "8a1e2c2f0e2a6d4b8f0a1c3e5d7f9b2a4c6e8d0f";

pub fn sample_snapshot() -> RepositorySnapshot {
    RepositorySnapshot {
        tree: Digest::from_hex(TREE_HEX).unwrap(),
        parent: Some(Digest::from_hex(PARENT_HEX).unwrap()),
        identity: Identity::new("Ada Lovelace", "ada@example.com"),
        when: Timestamp::new(1_700_000_000, 60),
    }
}

/// Recover the attempt counter from a rendered candidate.
pub fn counter_of(payload: &[u8]) -> u64 {
    let text = std::str::from_utf8(payload).unwrap();
    let start = text.rfind(SALT_LABEL).unwrap() + SALT_LABEL.len();
    let token = text[start..].strip_suffix('\n').unwrap();
    salt::decode(token).unwrap()
}

/// Digest whose byte 0 is the counter's low byte and bytes 1..9 the counter
/// in big-endian order. The rest is filler.
pub fn counter_digest(counter: u64) -> Digest {
    let mut bytes = [0x5a; DIGEST_LEN];
    bytes[0] = counter as u8;
    bytes[1..9].copy_from_slice(&counter.to_be_bytes());
    Digest::from_hash(bytes)
}

/// Hex prefix that only [`counter_digest`] of `counter` matches.
pub fn exact_prefix(counter: u64) -> String {
    hex_of(&counter_digest(counter).as_bytes()[..9])
}

fn hex_of(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Deterministic digester keyed on the salt, counting its invocations.
#[derive(Default)]
pub struct CounterDigester {
    calls: AtomicU64,
}

impl CounterDigester {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Digester for CounterDigester {
    fn digest(&self, payload: &[u8]) -> ExternalResult<Digest> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(counter_digest(counter_of(payload)))
    }
}
