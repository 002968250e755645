use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use novelty_types::Digest;

use crate::error::{ExternalError, ExternalResult, Stage};
use crate::template::RepositorySnapshot;
use crate::traits::{Checkout, Digester, ObjectWriter, RepositoryState};

/// In-memory repository over a fixed snapshot.
///
/// Intended for tests and embedding. Written objects are keyed by the id the
/// digester assigns them, so writes re-hash exactly the way the search did.
/// Individual stages can be made to fail with [`fail_at`](Self::fail_at).
pub struct InMemoryRepository<D: Digester> {
    snapshot: RepositorySnapshot,
    digester: D,
    objects: RwLock<HashMap<Digest, Vec<u8>>>,
    head: RwLock<Option<Digest>>,
    failing: RwLock<HashSet<Stage>>,
}

impl<D: Digester> InMemoryRepository<D> {
    /// Create a repository whose `HEAD` is the snapshot's parent.
    pub fn new(snapshot: RepositorySnapshot, digester: D) -> Self {
        let head = snapshot.parent;
        Self {
            snapshot,
            digester,
            objects: RwLock::new(HashMap::new()),
            head: RwLock::new(head),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Make every later call that reaches `stage` fail.
    pub fn fail_at(&self, stage: Stage) {
        self.failing.write().expect("lock poisoned").insert(stage);
    }

    /// The commit `HEAD` currently points at.
    pub fn head(&self) -> Option<Digest> {
        *self.head.read().expect("lock poisoned")
    }

    /// Read back a written object.
    pub fn read(&self, id: &Digest) -> Option<Vec<u8>> {
        self.objects.read().expect("lock poisoned").get(id).cloned()
    }

    /// Number of written objects.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    fn check(&self, stage: Stage) -> ExternalResult<()> {
        if self.failing.read().expect("lock poisoned").contains(&stage) {
            return Err(ExternalError::new(stage, "injected failure"));
        }
        Ok(())
    }
}

impl<D: Digester> RepositoryState for InMemoryRepository<D> {
    fn snapshot(&self) -> ExternalResult<RepositorySnapshot> {
        self.check(Stage::Identity)?;
        self.check(Stage::Tree)?;
        self.check(Stage::Head)?;
        let mut snapshot = self.snapshot.clone();
        snapshot.parent = self.head();
        Ok(snapshot)
    }
}

impl<D: Digester> ObjectWriter for InMemoryRepository<D> {
    fn write_commit(&self, payload: &[u8]) -> ExternalResult<Digest> {
        self.check(Stage::Write)?;
        let id = self
            .digester
            .digest(payload)
            .map_err(|e| ExternalError::new(Stage::Write, e.message))?;
        self.objects
            .write()
            .expect("lock poisoned")
            .entry(id)
            .or_insert_with(|| payload.to_vec());
        Ok(id)
    }
}

impl<D: Digester> Checkout for InMemoryRepository<D> {
    fn reset_to(&self, id: &Digest) -> ExternalResult<()> {
        self.check(Stage::Checkout)?;
        if !self.objects.read().expect("lock poisoned").contains_key(id) {
            return Err(ExternalError::new(
                Stage::Checkout,
                format!("unknown commit {id}"),
            ));
        }
        *self.head.write().expect("lock poisoned") = Some(*id);
        Ok(())
    }
}

impl<D: Digester> std::fmt::Debug for InMemoryRepository<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("head", &self.head())
            .field("object_count", &self.len())
            .finish()
    }
}
