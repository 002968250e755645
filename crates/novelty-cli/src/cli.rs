use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "novelty",
    about = "Mine git commits whose object id matches a hex pattern",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with a `[search]` table and `default_cycle`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mine a commit of the staged index and move the branch onto it
    Commit(CommitArgs),
    /// Show what a pattern constrains and how long it should take
    Estimate(EstimateArgs),
}

/// Exactly one of `--prefix` / `--repeat` is required. The check is left to
/// pattern resolution so both modes report the same errors.
#[derive(Args, Clone, Debug, Default)]
pub struct PatternArgs {
    /// Hex digits the commit id must start with
    #[arg(short, long)]
    pub prefix: Option<String>,
    /// Hex digits tiled over the whole commit id
    #[arg(short, long)]
    pub repeat: Option<String>,
    /// Period of the repeat pattern (1-39)
    #[arg(short, long)]
    pub cycle: Option<u32>,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
    #[command(flatten)]
    pub pattern: PatternArgs,
    /// Worker threads (default: one per CPU)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
    #[arg(long)]
    pub max_attempts: Option<u64>,
    #[arg(long)]
    pub report_interval: Option<u64>,
    /// Search only; write nothing and leave the branch alone
    #[arg(long)]
    pub dry_run: bool,
    #[arg(short = 'C', long, default_value = ".")]
    pub repo: PathBuf,
}

#[derive(Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub pattern: PatternArgs,
}
