//! Closing Core Domain
//!
//! Pure domain types for closing-auction order book analysis.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Book sides
    BookSide,
    // Engine outputs
    ClearingPoint,
    // Ladder
    MarketLevel,
    // Snapshots
    OrderBookSnapshot,
    PreCloseResult,
    PriceLadder,
    PriceLevel,
    SideColumn,
    SideSelector,
    SnapshotTime,
    UncrossResult,
};
pub use error::{BookError, BookResult};
pub use values::{BookKey, Lag, Price, Symbol, TradeDate, Volume};
