//! Closing Ports
//!
//! Port definitions (traits) for closing-auction order book analysis.
//! These define the boundaries between the pure engines and the drivers.

mod auction;
mod error;
mod reference;

pub use auction::AuctionEngine;
pub use error::{AuctionError, AuctionResult};
pub use reference::{ClosePriceSource, NoClosePrices};
