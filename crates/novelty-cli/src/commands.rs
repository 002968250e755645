use anyhow::Context;
use colored::Colorize;

use novelty_git::{GitObjectHasher, GitRepository};
use novelty_pattern::{CompiledPattern, PatternSpec};
use novelty_search::{CancelToken, CommitRequest, MinedCommit, Miner, TracingProgress};
use novelty_types::ValidationError;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Commit(args) => cmd_commit(args, &config, &cli.format),
        Command::Estimate(args) => cmd_estimate(args, &config, &cli.format),
    }
}

fn pattern_spec(args: &PatternArgs, config: &CliConfig) -> Result<PatternSpec, ValidationError> {
    PatternSpec::resolve(
        args.prefix.as_deref(),
        args.repeat.as_deref(),
        args.cycle.unwrap_or(config.default_cycle),
    )
}

fn cmd_commit(args: CommitArgs, config: &CliConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel()).context("installing Ctrl-C handler")?;

    let mined = mine(&args, config, cancel)?;
    print_mined(&mined, format)
}

/// Validate, open the repository and mine. Bad input is rejected before the
/// repository is touched.
fn mine(args: &CommitArgs, config: &CliConfig, cancel: CancelToken) -> anyhow::Result<MinedCommit> {
    let request = CommitRequest::new(args.message.as_str(), pattern_spec(&args.pattern, config)?);
    request.validate()?;

    let repo = GitRepository::open(&args.repo)?;
    let miner = Miner::new(GitObjectHasher, config.search_for(args))
        .with_progress(TracingProgress)
        .with_cancel(cancel);
    let mined = if args.dry_run {
        miner.preview(&repo, &request)?
    } else {
        miner.commit(&repo, &request)?
    };
    Ok(mined)
}

fn print_mined(mined: &MinedCommit, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(mined)?),
        OutputFormat::Text => {
            if mined.written {
                println!("{} Committed {}", "✓".green().bold(), mined.id.to_hex().yellow().bold());
            } else {
                println!(
                    "{} Found {} {}",
                    "✓".green().bold(),
                    mined.id.to_hex().yellow().bold(),
                    "(dry run, nothing written)".dimmed()
                );
            }
            println!("  Pattern:  {}", mined.pattern.cyan());
            println!("  Attempts: {}", mined.attempts);
            println!("  Salt:     {:?}", mined.salt);
        }
    }
    Ok(())
}

fn cmd_estimate(args: EstimateArgs, config: &CliConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let compiled = pattern_spec(&args.pattern, config)?.compile()?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&estimate_json(&compiled))?);
        }
        OutputFormat::Text => {
            println!("Pattern:           {}", compiled.describe().cyan());
            println!("Constrained bits:  {}", compiled.constrained_bits());
            println!("Expected attempts: {:.0}", compiled.expected_attempts());
        }
    }
    Ok(())
}

fn estimate_json(compiled: &CompiledPattern) -> serde_json::Value {
    serde_json::json!({
        "pattern": compiled.describe(),
        "constrained_bits": compiled.constrained_bits(),
        "expected_attempts": compiled.expected_attempts(),
    })
}
