//! Analysis configuration
//!
//! Loaded from a JSON file; every section has defaults so a file only needs
//! the fields it changes:
//!
//! ```json
//! {
//!   "mode": "sensitivity",
//!   "input": { "snapshots": "Data/orders_close_closing_main_v3.csv" },
//!   "sensitivity": { "policy": "CrossedVolume", "granularity": "fine" },
//!   "export": { "dir": "Exports", "format": "csv" }
//! }
//! ```

use std::path::{Path, PathBuf};

use closing_core::Lag;
use closing_liquidity::{Percent, RemovalPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::drivers::Scenario;
use crate::error::ConfigError;
use crate::export::ExportConfig;

/// Which analysis a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Uncross after removing liquidity
    Sensitivity,
    /// Pre-auction spread, start and end uncross, actual close
    #[default]
    Discovery,
    /// Uncross at every recorded lag of the closing window
    Intervals,
}

impl AnalysisMode {
    /// Default export file stem
    pub fn default_filename(&self, granularity: Granularity) -> String {
        match self {
            AnalysisMode::Sensitivity => format!("Sensitivity_{}", granularity.as_str()),
            AnalysisMode::Discovery => "Price_Discovery".to_string(),
            AnalysisMode::Intervals => "Intervals".to_string(),
        }
    }
}

/// Percent sweep of the limit-order scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// 0% to 50% in 5% steps
    #[default]
    Rough,
    /// 0% to 25% in 1% steps
    Fine,
}

impl Granularity {
    pub fn percents(&self) -> Vec<Percent> {
        let (step, steps) = match self {
            Granularity::Rough => (5, 10),
            Granularity::Fine => (1, 25),
        };
        (0..=steps)
            .filter_map(|i| Percent::new(Decimal::new(i * step, 2)).ok())
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Rough => "rough",
            Granularity::Fine => "fine",
        }
    }
}

/// Input files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Order book snapshots (one row per date, symbol and price)
    pub snapshots: PathBuf,
    /// Observed closing prices, needed by the discovery run only
    pub close_prices: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            snapshots: PathBuf::from("Data/orders_close_closing_main_v3.csv"),
            close_prices: Some(PathBuf::from("Data/orders_closing_prices.csv")),
        }
    }
}

/// Liquidity-removal sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    /// Removal base for the percentage scenarios
    pub policy: RemovalPolicy,
    pub granularity: Granularity,
    /// Explicit sweep, overrides `granularity`
    pub percents: Option<Vec<Percent>>,
    pub scenarios: Vec<Scenario>,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            policy: RemovalPolicy::SeparatePassive,
            granularity: Granularity::Rough,
            percents: None,
            scenarios: vec![
                Scenario::BidLimit,
                Scenario::AskLimit,
                Scenario::AllLimit,
                Scenario::AllMarket,
                Scenario::AllCont,
            ],
        }
    }
}

impl SensitivityConfig {
    /// Percent sweep of the limit-order scenarios
    pub fn sweep(&self) -> Vec<Percent> {
        match &self.percents {
            Some(percents) => percents.clone(),
            None => self.granularity.percents(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    /// Lag whose uncross every other lag is compared against
    pub reference_lag: Lag,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self { reference_lag: 600 }
    }
}

/// Root configuration of an analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    pub input: InputConfig,
    pub sensitivity: SensitivityConfig,
    pub intervals: IntervalConfig,
    pub export: ExportConfig,
    pub batch: BatchConfig,
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == AnalysisMode::Sensitivity {
            if self.sensitivity.scenarios.is_empty() {
                return Err(ConfigError::Invalid(
                    "sensitivity run needs at least one scenario".to_string(),
                ));
            }
            let has_limit = self.sensitivity.scenarios.iter().any(|s| s.sweeps_percents());
            if has_limit && self.sensitivity.sweep().is_empty() {
                return Err(ConfigError::Invalid(
                    "limit scenarios need a non-empty percent sweep".to_string(),
                ));
            }
        }
        if self.batch.threads == Some(0) {
            return Err(ConfigError::Invalid("thread count must be > 0".to_string()));
        }
        if matches!(&self.export.filename, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::Invalid("export filename is empty".to_string()));
        }
        Ok(())
    }

    /// Export file stem: configured, or derived from the mode
    pub fn export_filename(&self) -> String {
        self.export
            .filename
            .clone()
            .unwrap_or_else(|| self.mode.default_filename(self.sensitivity.granularity))
    }
}
