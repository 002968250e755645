use std::path::Path;

use chrono::Local;
use git2::{ErrorCode, ObjectType, Repository, ResetType};
use tracing::debug;

use novelty_search::{
    Checkout, ExternalError, ExternalResult, Identity, ObjectWriter, RepositorySnapshot,
    RepositoryState, Stage, Timestamp,
};
use novelty_types::Digest;

use crate::error::{at, digest_of, oid_of};

/// A git repository on disk, accessed through libgit2.
pub struct GitRepository {
    repo: Repository,
    timestamp: Option<Timestamp>,
}

impl GitRepository {
    /// Open the repository at `path` (no upward discovery).
    pub fn open(path: impl AsRef<Path>) -> ExternalResult<Self> {
        let repo = Repository::open(path.as_ref()).map_err(at(Stage::Repository))?;
        Ok(Self::from_repository(repo))
    }

    /// Wrap an already opened repository.
    pub fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            timestamp: None,
        }
    }

    /// Use a fixed commit instant instead of the local clock.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The underlying libgit2 handle.
    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    fn identity(&self) -> ExternalResult<Identity> {
        let config = self.repo.config().map_err(at(Stage::Identity))?;
        identity_from(&config)
    }

    /// Write the staged index out as a tree.
    fn tree(&self) -> ExternalResult<Digest> {
        let mut index = self.repo.index().map_err(at(Stage::Tree))?;
        let oid = index.write_tree().map_err(at(Stage::Tree))?;
        digest_of(oid, Stage::Tree)
    }

    /// Commit `HEAD` points at, or `None` on an unborn branch.
    fn parent(&self) -> ExternalResult<Option<Digest>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None)
            }
            Err(e) => return Err(at(Stage::Head)(e)),
        };
        let oid = head
            .target()
            .ok_or_else(|| ExternalError::new(Stage::Head, "HEAD does not resolve to a commit"))?;
        digest_of(oid, Stage::Head).map(Some)
    }

    fn now(&self) -> Timestamp {
        self.timestamp.unwrap_or_else(|| {
            let now = Local::now();
            Timestamp::new(now.timestamp(), now.offset().local_minus_utc() / 60)
        })
    }
}

/// Read `user.name` and `user.email` from a (layered) git config.
fn identity_from(config: &git2::Config) -> ExternalResult<Identity> {
    let lookup = |key: &str| {
        config
            .get_string(key)
            .map_err(|e| ExternalError::new(Stage::Identity, format!("{key}: {}", e.message())))
    };
    Ok(Identity::new(lookup("user.name")?, lookup("user.email")?))
}

impl RepositoryState for GitRepository {
    fn snapshot(&self) -> ExternalResult<RepositorySnapshot> {
        let identity = self.identity()?;
        let tree = self.tree()?;
        let parent = self.parent()?;
        let when = self.now();
        debug!(%tree, parent = ?parent, "repository snapshot taken");
        Ok(RepositorySnapshot {
            tree,
            parent,
            identity,
            when,
        })
    }
}

impl ObjectWriter for GitRepository {
    fn write_commit(&self, payload: &[u8]) -> ExternalResult<Digest> {
        let odb = self.repo.odb().map_err(at(Stage::Write))?;
        let oid = odb
            .write(ObjectType::Commit, payload)
            .map_err(at(Stage::Write))?;
        digest_of(oid, Stage::Write)
    }
}

impl Checkout for GitRepository {
    /// Mixed reset: the branch and index move, working files stay.
    fn reset_to(&self, id: &Digest) -> ExternalResult<()> {
        let oid = oid_of(id, Stage::Checkout)?;
        let commit = self
            .repo
            .find_object(oid, Some(ObjectType::Commit))
            .map_err(at(Stage::Checkout))?;
        self.repo
            .reset(&commit, ResetType::Mixed, None)
            .map_err(at(Stage::Checkout))
    }
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.repo.path())
            .finish()
    }
}
