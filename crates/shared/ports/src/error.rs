use closing_core::Price;
use thiserror::Error;

/// Modeling failures of the auction engines
///
/// Degenerate but legitimate books (an empty side, zero matched volume) are
/// not errors; they come back as undefined fields of the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("Spread inversion: best bid {best_bid} above best ask {best_ask}")]
    SpreadInversion { best_bid: Price, best_ask: Price },

    #[error("No limit levels in book")]
    NoLimitLevels,
}

pub type AuctionResult<T> = std::result::Result<T, AuctionError>;
