//! End-to-end run: load, analyse, export

use std::path::PathBuf;
use std::time::{Duration, Instant};

use closing_matching::CumulativeDepthEngine;
use closing_ports::{AuctionEngine, NoClosePrices};

use crate::batch::{BatchProcessor, UnitFailure};
use crate::config::{AnalysisConfig, AnalysisMode};
use crate::drivers::{
    self, Analysis, AnalysisReport, DiscoveryAnalysis, IntervalAnalysis, SensitivityAnalysis,
};
use crate::error::Result;
use crate::export;
use crate::loader::{ClosePrices, SnapshotBook};

/// What a completed run produced
#[derive(Debug)]
pub struct RunSummary {
    pub mode: AnalysisMode,
    pub units: usize,
    pub rows: usize,
    pub failures: Vec<UnitFailure>,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Run the configured analysis and export its table
pub fn run(config: &AnalysisConfig) -> Result<RunSummary> {
    config.validate()?;
    let start = Instant::now();

    let book = SnapshotBook::from_path(&config.input.snapshots)?;
    let batch = BatchProcessor::new(config.batch.clone());
    let engine = CumulativeDepthEngine;
    log::info!("Auction engine: {}", engine.name());

    let mut summary = match config.mode {
        AnalysisMode::Sensitivity => {
            let analysis = SensitivityAnalysis::new(
                engine,
                config.sensitivity.policy,
                config.sensitivity.scenarios.clone(),
                config.sensitivity.sweep(),
            );
            log::info!("Removal policy: {}", analysis.policy());
            finish(config, &analysis, &book, &batch)?
        }
        AnalysisMode::Discovery => match &config.input.close_prices {
            Some(path) => {
                let closes = ClosePrices::from_path(path)?;
                finish(config, &DiscoveryAnalysis::new(engine, closes), &book, &batch)?
            }
            None => {
                log::warn!("No closing price file configured, actual_close_price stays empty");
                finish(
                    config,
                    &DiscoveryAnalysis::new(engine, NoClosePrices),
                    &book,
                    &batch,
                )?
            }
        },
        AnalysisMode::Intervals => {
            let analysis = IntervalAnalysis::new(engine, config.intervals.reference_lag);
            finish(config, &analysis, &book, &batch)?
        }
    };

    summary.elapsed = start.elapsed();
    log::info!(
        "Run finished: {} rows from {} units in {:.2?}",
        summary.rows,
        summary.units,
        summary.elapsed
    );
    Ok(summary)
}

fn finish<A: Analysis>(
    config: &AnalysisConfig,
    analysis: &A,
    book: &SnapshotBook,
    batch: &BatchProcessor,
) -> Result<RunSummary> {
    let AnalysisReport {
        table,
        failures,
        units,
        elapsed,
    } = drivers::run(analysis, book, batch)?;

    let output = export::export(&table, &config.export, &config.export_filename())?;

    Ok(RunSummary {
        mode: config.mode,
        units,
        rows: table.len(),
        failures,
        output,
        elapsed,
    })
}
