//! The salt search loop.
//!
//! Counter `n` is tried by rendering the template with `salt::encode(n)`,
//! hashing it and testing the digest against the pattern. With one worker the
//! counters are tried in order on the calling thread. With `n` workers, worker
//! `k` tries `k, k + n, k + 2n, ...` on its own scoped thread.
//!
//! Workers share two things: the lowest counter at which any worker matched or
//! failed, and the running attempt count. A worker stops as soon as its next
//! counter is above that stop counter, so every counter below it has been
//! tried. Unless the run is cancelled, the parallel result (match or digester
//! error) is the one the sequential loop would produce.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use serde::Serialize;
use tracing::debug;

use novelty_pattern::CompiledPattern;
use novelty_types::Digest;

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::error::{ExternalError, ExternalResult};
use crate::progress::{ProgressReporter, SilentProgress};
use crate::salt;
use crate::template::CommitTemplate;
use crate::traits::Digester;

/// Attempts a worker counts locally before publishing them.
const FLUSH_EVERY: u64 = 256;

static SILENT: SilentProgress = SilentProgress;

/// A candidate whose digest satisfies the pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Zero-based attempt counter of the match.
    pub counter: u64,
    /// Salt token rendered for `counter`.
    pub salt: String,
    /// The full commit record.
    #[serde(skip)]
    pub payload: Vec<u8>,
    pub digest: Digest,
}

impl SearchMatch {
    /// One-based attempt number of the match.
    pub fn attempts(&self) -> u64 {
        self.counter.saturating_add(1)
    }
}

/// How a search run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchMatch),
    /// Every counter below the configured ceiling was tried.
    LimitReached { attempts: u64 },
    /// The cancel token fired before a match was found.
    Cancelled { attempts: u64 },
}

/// Runs the search loop for one pattern and one frozen template.
pub struct Searcher<'a, D: Digester + ?Sized> {
    pattern: &'a CompiledPattern,
    template: &'a CommitTemplate,
    digester: &'a D,
    config: SearchConfig,
    progress: &'a dyn ProgressReporter,
    cancel: CancelToken,
}

impl<'a, D: Digester + ?Sized> Searcher<'a, D> {
    /// A sequential searcher with no ceiling and no progress output.
    pub fn new(pattern: &'a CompiledPattern, template: &'a CommitTemplate, digester: &'a D) -> Self {
        Self {
            pattern,
            template,
            digester,
            config: SearchConfig::sequential(),
            progress: &SILENT,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Search until a match, the attempt ceiling or cancellation.
    ///
    /// A digester failure stops every worker and is returned as is, unless a
    /// match was found at a lower counter.
    pub fn run(&self) -> ExternalResult<SearchOutcome> {
        let workers = self.config.effective_workers();
        let shared = Shared::new();
        debug!(
            workers,
            bits = self.pattern.constrained_bits(),
            pattern = %self.pattern,
            "starting search"
        );

        let ends = if workers == 1 {
            vec![self.run_shard(0, 1, &shared)]
        } else {
            let stride = workers as u64;
            thread::scope(|scope| {
                let handles: Vec<_> = (0..stride)
                    .map(|first| {
                        let shared = &shared;
                        scope.spawn(move || self.run_shard(first, stride, shared))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect::<Vec<_>>()
            })
        };

        let mut best: Option<SearchMatch> = None;
        let mut failure: Option<(u64, ExternalError)> = None;
        let mut cancelled = false;
        for end in ends {
            match end {
                ShardEnd::Found(found) => {
                    if best.as_ref().map_or(true, |b| found.counter < b.counter) {
                        best = Some(found);
                    }
                }
                ShardEnd::Failed { counter, error } => {
                    if failure.as_ref().map_or(true, |(c, _)| counter < *c) {
                        failure = Some((counter, error));
                    }
                }
                ShardEnd::Cancelled => cancelled = true,
                ShardEnd::Exhausted | ShardEnd::Outrun => {}
            }
        }

        if let Some((counter, error)) = failure {
            if best.as_ref().map_or(true, |b| counter < b.counter) {
                return Err(error);
            }
        }
        let attempts = shared.hashed.load(Ordering::SeqCst);
        Ok(match best {
            Some(found) => SearchOutcome::Found(found),
            None if cancelled => SearchOutcome::Cancelled { attempts },
            None => SearchOutcome::LimitReached { attempts },
        })
    }

    fn run_shard(&self, first: u64, stride: u64, shared: &Shared) -> ShardEnd {
        debug!(worker = first, "search worker started");
        let limit = self.config.max_attempts;
        let interval = self.config.effective_report_interval();
        let mut salt = String::with_capacity(salt::MAX_LEN);
        let mut payload = Vec::new();
        // Attempts not yet added to `shared.hashed`, and all attempts so far.
        let mut pending = 0u64;
        let mut done = 0u64;
        let mut counter = first;

        let end = loop {
            if limit.is_some_and(|limit| counter >= limit) {
                break ShardEnd::Exhausted;
            }
            if self.cancel.is_cancelled() {
                break ShardEnd::Cancelled;
            }
            if counter > shared.stop.load(Ordering::Acquire) {
                break ShardEnd::Outrun;
            }

            salt::encode_into(counter, &mut salt);
            self.template.render_into(&salt, &mut payload);
            let digest = match self.digester.digest(&payload) {
                Ok(digest) => digest,
                Err(error) => {
                    shared.stop.fetch_min(counter, Ordering::AcqRel);
                    break ShardEnd::Failed { counter, error };
                }
            };

            if self.pattern.matches(&digest) {
                shared.stop.fetch_min(counter, Ordering::AcqRel);
                shared.publish(pending, interval, self.progress);
                shared.hashed.fetch_add(1, Ordering::SeqCst);
                debug!(worker = first, counter, %digest, "match found");
                return ShardEnd::Found(SearchMatch {
                    counter,
                    salt,
                    payload,
                    digest,
                });
            }

            pending += 1;
            done += 1;
            // A lone worker owns the shared count, so it can flush exactly on
            // each interval boundary.
            if pending == FLUSH_EVERY || (stride == 1 && done % interval == 0) {
                shared.publish(pending, interval, self.progress);
                pending = 0;
            }

            counter = match counter.checked_add(stride) {
                Some(next) => next,
                None => break ShardEnd::Exhausted,
            };
        };

        shared.publish(pending, interval, self.progress);
        debug!(worker = first, end = ?end, "search worker finished");
        end
    }
}

/// Why a worker stopped.
#[derive(Debug)]
enum ShardEnd {
    Found(SearchMatch),
    Failed { counter: u64, error: ExternalError },
    Exhausted,
    Cancelled,
    /// Another worker matched or failed at a lower counter.
    Outrun,
}

struct Shared {
    /// Lowest counter at which a worker matched or failed; `u64::MAX` until
    /// then.
    stop: AtomicU64,
    /// Candidates hashed across all workers.
    hashed: AtomicU64,
}

impl Shared {
    fn new() -> Self {
        Self {
            stop: AtomicU64::new(u64::MAX),
            hashed: AtomicU64::new(0),
        }
    }

    /// Add `count` attempts and report every interval boundary crossed.
    fn publish(&self, count: u64, interval: u64, progress: &dyn ProgressReporter) {
        if count == 0 {
            return;
        }
        let before = self.hashed.fetch_add(count, Ordering::SeqCst);
        let after = before + count;
        for boundary in (before / interval + 1)..=(after / interval) {
            progress.report(boundary * interval);
        }
    }
}
