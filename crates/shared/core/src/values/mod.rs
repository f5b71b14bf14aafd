use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Resting order volume (shares), non-negative by construction of the ladder
pub type Volume = Decimal;

/// Symbol identifier for a listed security
pub type Symbol = String;

/// Trading date of a snapshot (the exchange "onbook" date)
pub type TradeDate = NaiveDate;

/// Offset in seconds into the closing window at which a snapshot was taken
pub type Lag = u32;

/// Identifies one order book partition: a (date, symbol) pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookKey {
    pub date: TradeDate,
    pub symbol: Symbol,
}

impl BookKey {
    pub fn new(date: TradeDate, symbol: impl Into<Symbol>) -> Self {
        Self {
            date,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date, self.symbol)
    }
}
