use git2::{ObjectType, Oid};

use novelty_search::{Digester, ExternalResult, Stage};
use novelty_types::Digest;

use crate::error::{at, digest_of};

/// git's object id for a commit record: SHA-1 over `commit <len>\0<record>`.
///
/// Stateless; safe to share across search workers.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitObjectHasher;

impl Digester for GitObjectHasher {
    fn digest(&self, payload: &[u8]) -> ExternalResult<Digest> {
        let oid = Oid::hash_object(ObjectType::Commit, payload).map_err(at(Stage::Digest))?;
        digest_of(oid, Stage::Digest)
    }
}
