use serde::Serialize;
use tracing::{debug, info, warn};

use novelty_pattern::{CompiledPattern, PatternSpec};
use novelty_types::{Digest, ValidationError};

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::error::MineError;
use crate::progress::{ProgressReporter, SilentProgress};
use crate::search::{SearchMatch, SearchOutcome, Searcher};
use crate::template::CommitTemplate;
use crate::traits::{Checkout, Digester, ObjectWriter, RepositoryState};

/// What to mine: a commit message and the pattern its id must satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRequest {
    pub message: String,
    pub pattern: PatternSpec,
}

impl CommitRequest {
    pub fn new(message: impl Into<String>, pattern: PatternSpec) -> Self {
        Self {
            message: message.into(),
            pattern,
        }
    }

    /// Check the message, then compile the pattern.
    pub fn validate(&self) -> Result<CompiledPattern, ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.pattern.compile()
    }
}

/// Result of a successful mining run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinedCommit {
    /// Object id of the mined commit.
    pub id: Digest,
    pub counter: u64,
    /// One-based number of the winning attempt.
    pub attempts: u64,
    pub salt: String,
    /// The pattern, `.` marking free nibbles.
    pub pattern: String,
    /// `false` for a preview: nothing was written and the checkout is
    /// untouched.
    pub written: bool,
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl MinedCommit {
    fn from_match(found: SearchMatch, pattern: &CompiledPattern) -> Self {
        Self {
            id: found.digest,
            counter: found.counter,
            attempts: found.attempts(),
            salt: found.salt,
            pattern: pattern.describe(),
            written: false,
            payload: found.payload,
        }
    }
}

/// Mines commits against a repository.
pub struct Miner<D: Digester> {
    digester: D,
    config: SearchConfig,
    progress: Box<dyn ProgressReporter>,
    cancel: CancelToken,
}

impl<D: Digester> Miner<D> {
    pub fn new(digester: D, config: SearchConfig) -> Self {
        Self {
            digester,
            config,
            progress: Box::new(SilentProgress),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressReporter + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a matching commit without writing it.
    ///
    /// Validates the message and the pattern before the repository is read,
    /// then snapshots the repository exactly once.
    pub fn preview<R: RepositoryState>(
        &self,
        repo: &R,
        request: &CommitRequest,
    ) -> Result<MinedCommit, MineError> {
        let pattern = request.validate()?;
        let snapshot = repo.snapshot()?;
        let template = CommitTemplate::new(snapshot, request.message.as_str())?;

        debug!(
            pattern = %pattern,
            expected_attempts = pattern.expected_attempts(),
            workers = self.config.effective_workers(),
            "mining commit"
        );
        let found = self.search(&pattern, &template)?;
        Ok(MinedCommit::from_match(found, &pattern))
    }

    /// Find a matching commit, write it and reset the checkout onto it.
    pub fn commit<R>(&self, repo: &R, request: &CommitRequest) -> Result<MinedCommit, MineError>
    where
        R: RepositoryState + ObjectWriter + Checkout,
    {
        let mut mined = self.preview(repo, request)?;
        let id = repo.write_commit(&mined.payload)?;
        if id != mined.id {
            warn!(searched = %mined.id, written = %id, "object store assigned a different id");
            mined.id = id;
        }
        repo.reset_to(&id)?;
        mined.written = true;
        info!(id = %id, attempts = mined.attempts, "commit written");
        Ok(mined)
    }

    fn search(
        &self,
        pattern: &CompiledPattern,
        template: &CommitTemplate,
    ) -> Result<SearchMatch, MineError> {
        let outcome = Searcher::new(pattern, template, &self.digester)
            .with_config(self.config.clone())
            .with_progress(self.progress.as_ref())
            .with_cancel(self.cancel.clone())
            .run()?;
        match outcome {
            SearchOutcome::Found(found) => Ok(found),
            SearchOutcome::LimitReached { attempts } => Err(MineError::LimitReached { attempts }),
            SearchOutcome::Cancelled { attempts } => Err(MineError::Cancelled { attempts }),
        }
    }
}
