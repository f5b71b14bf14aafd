//! Closing Runner - Closing Auction Analyses
//!
//! Runs the closing-auction analyses over a file of order book snapshots:
//!
//! - **Sensitivity**: uncross after withdrawing liquidity, per removal scenario
//! - **Price discovery**: pre-auction spread, start and end uncross, actual close
//! - **Intervals**: uncross at every recorded lag of the closing window
//!
//! ## Architecture
//!
//! ```text
//!        ┌────────────────────┐     ┌────────────────────┐
//!        │  Snapshot CSV      │     │  Close-price CSV   │
//!        └─────────┬──────────┘     └─────────┬──────────┘
//!                  │ loader                   │
//!                  ▼                          ▼
//!        ┌────────────────────┐     ┌────────────────────┐
//!        │   SnapshotBook     │     │   ClosePrices      │
//!        │ (date, symbol) ->  │     │ (ClosePriceSource) │
//!        │ OrderBookSnapshot  │     └─────────┬──────────┘
//!        └─────────┬──────────┘               │
//!                  │ one unit per snapshot    │
//!                  ▼                          │
//! ┌─────────────────────────────────────────────────────────────┐
//! │              BatchProcessor (rayon pool)                    │
//! │                                                             │
//! │   Sensitivity  ──►  LiquidityRemover ─┐                     │
//! │   Discovery    ─────────────────────┐ │                     │
//! │   Intervals    ───────────────────┐ │ │                     │
//! │                                   ▼ ▼ ▼                     │
//! │                    AuctionEngine (uncross / preclose)       │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ rows
//!                                ▼
//!                     ┌───────────────────────┐
//!                     │ ResultTable -> export │
//!                     │   (CSV / JSON)        │
//!                     └───────────────────────┘
//! ```

pub mod batch;
pub mod config;
pub mod drivers;
pub mod error;
pub mod export;
pub mod loader;
pub mod orchestrator;
pub mod results;

// Re-export main types
pub use batch::{BatchConfig, BatchOutput, BatchProcessor, ErrorMode, UnitFailure};
pub use config::{AnalysisConfig, AnalysisMode, Granularity};
pub use drivers::{
    Analysis, AnalysisReport, DiscoveryAnalysis, IntervalAnalysis, Scenario, SensitivityAnalysis,
};
pub use error::{ConfigError, Error, ExportError, LoadError, Result, UnitError};
pub use export::{ExportConfig, ExportFormat};
pub use loader::{ClosePrices, SnapshotBook};
pub use orchestrator::{run, RunSummary};
pub use results::{DiscoveryRow, IntervalRow, ResultRow, ResultTable, SensitivityRow};
