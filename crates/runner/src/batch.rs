//! Parallel processing of (date, symbol) units
//!
//! Every snapshot is an independent unit of work: drivers map over the units
//! on a rayon pool, each unit returns its own rows, and rows are merged once
//! all units finished. Nothing is shared between units.

use std::time::{Duration, Instant};

use closing_core::{BookKey, OrderBookSnapshot};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, UnitError};

/// What a run does when one unit fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Abort the run on the first failing unit
    #[default]
    FailFast,
    /// Log the failure, drop the unit's rows and carry on
    SkipUnit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads; `None` uses rayon's default (one per core)
    pub threads: Option<usize>,
    pub error_mode: ErrorMode,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }
}

/// A unit that failed under `ErrorMode::SkipUnit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub key: BookKey,
    pub error: UnitError,
}

/// Rows of every successful unit, in input order
#[derive(Debug)]
pub struct BatchOutput<R> {
    pub rows: Vec<R>,
    pub failures: Vec<UnitFailure>,
    /// Units processed, failed ones included
    pub units: usize,
    pub elapsed: Duration,
}

impl<R> BatchOutput<R> {
    pub fn successful_count(&self) -> usize {
        self.units - self.failures.len()
    }
}

pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run `unit` over every snapshot on a dedicated pool
    pub fn process<R, F>(&self, snapshots: &[OrderBookSnapshot], unit: F) -> Result<BatchOutput<R>>
    where
        R: Send,
        F: Fn(&OrderBookSnapshot) -> std::result::Result<Vec<R>, UnitError> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        let start = Instant::now();

        let (rows, failures) = match self.config.error_mode {
            ErrorMode::FailFast => {
                let per_unit: Vec<Vec<R>> = pool.install(|| {
                    snapshots
                        .par_iter()
                        .map(|snapshot| {
                            unit(snapshot).map_err(|source| Error::Unit {
                                key: snapshot.key().clone(),
                                source,
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })?;
                (per_unit.into_iter().flatten().collect(), Vec::new())
            }
            ErrorMode::SkipUnit => {
                let outcomes: Vec<_> = pool.install(|| {
                    snapshots
                        .par_iter()
                        .map(|snapshot| (snapshot.key(), unit(snapshot)))
                        .collect()
                });

                let mut rows = Vec::new();
                let mut failures = Vec::new();
                for (key, outcome) in outcomes {
                    match outcome {
                        Ok(unit_rows) => rows.extend(unit_rows),
                        Err(error) => {
                            log::warn!("Skipping {}: {}", key, error);
                            failures.push(UnitFailure {
                                key: key.clone(),
                                error,
                            });
                        }
                    }
                }
                (rows, failures)
            }
        };

        Ok(BatchOutput {
            rows,
            failures,
            units: snapshots.len(),
            elapsed: start.elapsed(),
        })
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}
