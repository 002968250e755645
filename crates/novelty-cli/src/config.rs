use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use novelty_pattern::DEFAULT_CYCLE;
use novelty_search::SearchConfig;

use crate::cli::CommitArgs;

/// Contents of the optional `--config` file.
///
/// ```toml
/// default_cycle = 4
///
/// [search]
/// workers = 8
/// max_attempts = 100000000
/// report_interval = 500000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub search: SearchConfig,
    /// Cycle used by `--repeat` when `--cycle` is not given.
    pub default_cycle: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            default_cycle: DEFAULT_CYCLE,
        }
    }
}

impl CliConfig {
    /// Load the file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The file's search settings with command-line flags laid over them.
    pub fn search_for(&self, args: &CommitArgs) -> SearchConfig {
        let mut search = self.search.clone();
        if let Some(jobs) = args.jobs {
            search.workers = jobs;
        }
        if let Some(max) = args.max_attempts {
            search.max_attempts = Some(max);
        }
        if let Some(interval) = args.report_interval {
            search.report_interval = interval;
        }
        search
    }
}
