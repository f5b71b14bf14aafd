use serde::{Deserialize, Serialize};

use crate::values::{Price, Volume};

/// The matched point of an uncrossed book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingPoint {
    pub price: Price,
    pub volume: Volume,
    /// Volume willing to buy at `price` or higher
    pub cum_bids: Volume,
    /// Volume willing to sell at `price` or lower
    pub cum_asks: Volume,
}

/// Outcome of uncrossing a closing auction book
///
/// Fields are `None` when the book cannot be uncrossed. An empty side leaves
/// everything undefined; a book that matches zero volume still reports its
/// resting totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UncrossResult {
    pub clearing: Option<ClearingPoint>,
    /// Full bid depth (market plus limit)
    pub total_bids: Option<Volume>,
    /// Full ask depth (market plus limit)
    pub total_asks: Option<Volume>,
}

impl UncrossResult {
    /// Nothing defined: one side of the book is empty
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn price(&self) -> Option<Price> {
        self.clearing.map(|c| c.price)
    }

    pub fn traded_volume(&self) -> Option<Volume> {
        self.clearing.map(|c| c.volume)
    }

    pub fn cum_bids(&self) -> Option<Volume> {
        self.clearing.map(|c| c.cum_bids)
    }

    pub fn cum_asks(&self) -> Option<Volume> {
        self.clearing.map(|c| c.cum_asks)
    }
}

/// Quoted spread of the last continuous book before the auction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreCloseResult {
    pub best_bid: Price,
    pub best_ask: Price,
    pub abs_spread: Price,
    pub midquote: Price,
    /// Spread relative to the midquote, in basis points
    pub rel_spread_bps: Price,
}
