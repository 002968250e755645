use tracing::info;

/// Observer notified with the running attempt count.
///
/// Reporters never influence the search; they only see how many candidates
/// have been hashed so far (1-based).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, attempts: u64);
}

/// Emits progress as `info` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, attempts: u64) {
        info!(attempts, "still searching");
    }
}

/// Discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _attempts: u64) {}
}
