use thiserror::Error;

use crate::values::{Lag, Price, Volume};

/// Errors raised while building ladders and snapshots
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Duplicate price level: {0}")]
    DuplicatePrice(Price),

    #[error("Price index not ascending at {0}")]
    UnsortedPrice(Price),

    #[error("Limit price must be positive: {0}")]
    NonPositivePrice(Price),

    #[error("Negative volume {volume} at price {price}")]
    NegativeVolume { price: Price, volume: Volume },

    #[error("Column has {actual} levels, ladder has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Missing volume column: {0}")]
    MissingColumn(String),

    #[error("Bid and ask lag columns differ: bids={bids:?}, asks={asks:?}")]
    LagMismatch { bids: Vec<Lag>, asks: Vec<Lag> },
}

pub type BookResult<T> = std::result::Result<T, BookError>;
