//! Closing auction analysis CLI
//!
//! Usage:
//!   closing-calc --config analysis.json
//!   closing-calc --mode sensitivity --policy CrossedVolume --granularity fine
//!   closing-calc --mode intervals --snapshots Data/snapshots.csv --format json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use closing_liquidity::RemovalPolicy;
use closing_runner::{AnalysisConfig, AnalysisMode, ErrorMode, ExportFormat, Granularity};

#[derive(Parser)]
#[command(name = "closing-calc")]
#[command(about = "Closing auction uncrossing and liquidity-removal analyses")]
struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis to run
    #[arg(short, long, value_enum)]
    mode: Option<AnalysisMode>,

    /// Order book snapshot CSV
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Observed closing prices CSV (discovery run)
    #[arg(long)]
    close_prices: Option<PathBuf>,

    /// Removal base of the sensitivity run (e.g. SeparatePassive, CrossedVolume)
    #[arg(long)]
    policy: Option<RemovalPolicy>,

    /// Percent sweep of the sensitivity run
    #[arg(long, value_enum)]
    granularity: Option<Granularity>,

    /// Directory results are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Log and skip failing (date, symbol) units instead of aborting
    #[arg(long)]
    skip_failed: bool,
}

impl Cli {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => AnalysisConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(snapshots) = self.snapshots {
            config.input.snapshots = snapshots;
        }
        if let Some(close_prices) = self.close_prices {
            config.input.close_prices = Some(close_prices);
        }
        if let Some(policy) = self.policy {
            config.sensitivity.policy = policy;
        }
        if let Some(granularity) = self.granularity {
            config.sensitivity.granularity = granularity;
            config.sensitivity.percents = None;
        }
        if let Some(dir) = self.output_dir {
            config.export.dir = dir;
        }
        if let Some(format) = self.format {
            config.export.format = format;
        }
        if let Some(threads) = self.threads {
            config.batch.threads = Some(threads);
        }
        if self.skip_failed {
            config.batch.error_mode = ErrorMode::SkipUnit;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config()?;
    log::info!(
        "Running {:?} analysis on {:?}",
        config.mode,
        config.input.snapshots
    );

    let summary = closing_runner::run(&config)
        .with_context(|| format!("{:?} analysis failed", config.mode))?;

    for failure in &summary.failures {
        log::error!("{}: {}", failure.key, failure.error);
    }
    println!(
        "{} rows from {} units written to {}",
        summary.rows,
        summary.units,
        summary.output.display()
    );

    Ok(())
}
