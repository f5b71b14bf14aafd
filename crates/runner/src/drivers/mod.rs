//! Analysis drivers
//!
//! A driver turns one (date, symbol) snapshot into result rows. [`run`] maps a
//! driver over every snapshot of a [`SnapshotBook`] on the batch pool and
//! collects the rows into a [`ResultTable`].

mod discovery;
mod intervals;
mod sensitivity;

use std::time::Duration;

use closing_core::OrderBookSnapshot;

pub use discovery::DiscoveryAnalysis;
pub use intervals::IntervalAnalysis;
pub use sensitivity::{Scenario, SensitivityAnalysis};

use crate::batch::{BatchProcessor, UnitFailure};
use crate::error::{Result, UnitError};
use crate::loader::SnapshotBook;
use crate::results::{ResultRow, ResultTable};

/// Per-snapshot computation of one analysis
pub trait Analysis: Sync {
    type Row: ResultRow;

    fn name(&self) -> &'static str;

    /// Rows of one (date, symbol) unit
    fn analyse(&self, snapshot: &OrderBookSnapshot) -> std::result::Result<Vec<Self::Row>, UnitError>;
}

/// Outcome of running one analysis over a snapshot book
#[derive(Debug)]
pub struct AnalysisReport<R> {
    pub table: ResultTable<R>,
    /// Units dropped under `ErrorMode::SkipUnit`
    pub failures: Vec<UnitFailure>,
    pub units: usize,
    pub elapsed: Duration,
}

pub fn run<A: Analysis>(
    analysis: &A,
    book: &SnapshotBook,
    batch: &BatchProcessor,
) -> Result<AnalysisReport<A::Row>> {
    log::info!(
        "{} analysis: {} units on {} thread(s)",
        analysis.name(),
        book.len(),
        batch
            .config()
            .threads
            .map_or_else(|| "default".to_string(), |t| t.to_string())
    );

    let output = batch.process(book.snapshots(), |snapshot| analysis.analyse(snapshot))?;

    log::info!(
        "{} analysis finished: {} rows from {}/{} units in {:.2?}",
        analysis.name(),
        output.rows.len(),
        output.successful_count(),
        output.units,
        output.elapsed
    );
    if !output.failures.is_empty() {
        log::warn!(
            "{} analysis skipped {} failing unit(s)",
            analysis.name(),
            output.failures.len()
        );
    }

    Ok(AnalysisReport {
        table: output.rows.into_iter().collect(),
        failures: output.failures,
        units: output.units,
        elapsed: output.elapsed,
    })
}
