use novelty_types::Digest;

use crate::error::ExternalResult;
use crate::template::RepositorySnapshot;

/// Hash function supplied by the object store.
///
/// Implementations must be pure with respect to the searcher: the same bytes
/// always produce the same digest, and the digest must equal the id the
/// object store assigns when the same bytes are written.
///
/// `Send + Sync` so one digester can be shared by every search worker.
/// Closures of the matching shape implement this trait directly.
pub trait Digester: Send + Sync {
    /// Hash one candidate commit record.
    fn digest(&self, payload: &[u8]) -> ExternalResult<Digest>;
}

impl<F> Digester for F
where
    F: Fn(&[u8]) -> ExternalResult<Digest> + Send + Sync,
{
    fn digest(&self, payload: &[u8]) -> ExternalResult<Digest> {
        self(payload)
    }
}

/// Read-once view of the repository the commit is mined for.
pub trait RepositoryState {
    /// Capture tree, parent, identity and commit instant.
    ///
    /// Called exactly once per run, before the search starts.
    fn snapshot(&self) -> ExternalResult<RepositorySnapshot>;
}

/// Persists the winning commit record.
pub trait ObjectWriter {
    /// Write a raw commit record and return its object id.
    fn write_commit(&self, payload: &[u8]) -> ExternalResult<Digest>;
}

/// Moves the working checkout onto a commit.
pub trait Checkout {
    /// Point the current branch at `id`. Failure is fatal and not retried.
    fn reset_to(&self, id: &Digest) -> ExternalResult<()>;
}
