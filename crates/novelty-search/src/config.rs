use serde::{Deserialize, Serialize};

/// Attempts between two progress reports.
pub const DEFAULT_REPORT_INTERVAL: u64 = 100_000;

/// Tuning for a search run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Number of worker threads. `1` runs the loop on the calling thread.
    pub workers: usize,
    /// Give up after this many candidates (counters `0..max_attempts`).
    pub max_attempts: Option<u64>,
    /// Report progress every this many hashed candidates.
    pub report_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            max_attempts: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl SearchConfig {
    /// Single-threaded search, candidates tried strictly in counter order.
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            ..Default::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_report_interval(mut self, report_interval: u64) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Worker count, at least one.
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }

    /// Report interval, at least one.
    pub fn effective_report_interval(&self) -> u64 {
        self.report_interval.max(1)
    }
}
