use closing_core::{PreCloseResult, PriceLadder, UncrossResult};

use crate::error::AuctionResult;

/// Port for closing auction price formation
///
/// Implementations are pure: no I/O and no state shared between calls, so a
/// single engine can be used from any number of worker threads.
pub trait AuctionEngine: Send + Sync {
    /// Theoretical uncrossing of the book at the close
    fn uncross(&self, ladder: &PriceLadder) -> UncrossResult;

    /// Quoted spread of the limit-order book (market orders ignored)
    fn preclose(&self, ladder: &PriceLadder) -> AuctionResult<PreCloseResult>;

    /// Get the name of the engine
    fn name(&self) -> &str;
}
