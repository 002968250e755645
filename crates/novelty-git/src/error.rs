use git2::Oid;

use novelty_search::{ExternalError, ExternalResult, Stage};
use novelty_types::Digest;

/// Adapter for `map_err`: tag a libgit2 error with the failing stage.
pub(crate) fn at(stage: Stage) -> impl FnOnce(git2::Error) -> ExternalError {
    move |e| ExternalError::new(stage, e.message())
}

pub(crate) fn digest_of(oid: Oid, stage: Stage) -> ExternalResult<Digest> {
    Digest::from_slice(oid.as_bytes()).map_err(|e| ExternalError::new(stage, e.to_string()))
}

pub(crate) fn oid_of(digest: &Digest, stage: Stage) -> ExternalResult<Oid> {
    Oid::from_bytes(digest.as_bytes()).map_err(at(stage))
}
