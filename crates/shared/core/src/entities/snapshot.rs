//! Order book snapshots of one (date, symbol) partition
//!
//! A snapshot stores the limit price index once and any number of volume
//! columns against it: the end-of-auction book plus the books recorded at
//! each lag of the closing window.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ladder::{MarketLevel, PriceLadder, PriceLevel};
use super::side::BookSide;
use crate::error::{BookError, BookResult};
use crate::values::{BookKey, Lag, Price, Volume};

/// Point in the closing window a volume column was recorded at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SnapshotTime {
    /// Snapshot `n` seconds into the closing window
    Lag(Lag),
    /// End of the closing auction, the book that gets uncrossed
    Close,
}

impl SnapshotTime {
    /// Start of the closing auction (the last continuous-trading book)
    pub const START: SnapshotTime = SnapshotTime::Lag(0);
}

impl fmt::Display for SnapshotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotTime::Lag(lag) => write!(f, "lag {}", lag),
            SnapshotTime::Close => write!(f, "close"),
        }
    }
}

/// One side's volumes at one snapshot time, aligned to the price index
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideColumn {
    pub market: Volume,
    pub limits: Vec<Volume>,
}

impl SideColumn {
    pub fn new(market: Volume, limits: Vec<Volume>) -> Self {
        Self { market, limits }
    }

    /// All-zero column for `len` limit levels
    pub fn zeros(len: usize) -> Self {
        Self {
            market: Decimal::ZERO,
            limits: vec![Decimal::ZERO; len],
        }
    }
}

/// Price-ladder volumes of one (date, symbol) across the closing window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    key: BookKey,
    prices: Vec<Price>,
    columns: BTreeMap<(SnapshotTime, BookSide), SideColumn>,
}

impl OrderBookSnapshot {
    /// Create a snapshot over an ascending, duplicate-free limit price index
    pub fn new(key: BookKey, prices: Vec<Price>) -> BookResult<Self> {
        for price in &prices {
            if *price <= Decimal::ZERO {
                return Err(BookError::NonPositivePrice(*price));
            }
        }
        if let Some(pair) = prices.windows(2).find(|w| w[0] >= w[1]) {
            if pair[0] == pair[1] {
                return Err(BookError::DuplicatePrice(pair[1]));
            }
            return Err(BookError::UnsortedPrice(pair[1]));
        }
        Ok(Self {
            key,
            prices,
            columns: BTreeMap::new(),
        })
    }

    /// Attach a volume column, replacing any previous one for the same slot
    pub fn with_column(
        mut self,
        time: SnapshotTime,
        side: BookSide,
        column: SideColumn,
    ) -> BookResult<Self> {
        self.insert_column(time, side, column)?;
        Ok(self)
    }

    pub fn insert_column(
        &mut self,
        time: SnapshotTime,
        side: BookSide,
        column: SideColumn,
    ) -> BookResult<()> {
        if column.limits.len() != self.prices.len() {
            return Err(BookError::LengthMismatch {
                expected: self.prices.len(),
                actual: column.limits.len(),
            });
        }
        if column.market < Decimal::ZERO {
            return Err(BookError::NegativeVolume {
                price: Decimal::ZERO,
                volume: column.market,
            });
        }
        if let Some((price, volume)) = self
            .prices
            .iter()
            .zip(&column.limits)
            .find(|(_, v)| **v < Decimal::ZERO)
        {
            return Err(BookError::NegativeVolume {
                price: *price,
                volume: *volume,
            });
        }
        self.columns.insert((time, side), column);
        Ok(())
    }

    pub fn key(&self) -> &BookKey {
        &self.key
    }

    /// Limit prices, ascending
    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn column(&self, time: SnapshotTime, side: BookSide) -> Option<&SideColumn> {
        self.columns.get(&(time, side))
    }

    /// Ladder of the book at `time`
    pub fn ladder_at(&self, time: SnapshotTime) -> BookResult<PriceLadder> {
        let bids = self.require(time, BookSide::Bid)?;
        let asks = self.require(time, BookSide::Ask)?;

        let levels = self
            .prices
            .iter()
            .zip(bids.limits.iter().zip(&asks.limits))
            .map(|(price, (bid, ask))| PriceLevel::new(*price, *bid, *ask))
            .collect();

        PriceLadder::new(MarketLevel::new(bids.market, asks.market), levels)
    }

    /// End-of-auction book
    pub fn closing_ladder(&self) -> BookResult<PriceLadder> {
        self.ladder_at(SnapshotTime::Close)
    }

    /// Lags recorded for one side, ascending
    pub fn lags(&self, side: BookSide) -> Vec<Lag> {
        self.columns
            .keys()
            .filter_map(|(time, s)| match time {
                SnapshotTime::Lag(lag) if *s == side => Some(*lag),
                _ => None,
            })
            .collect()
    }

    /// Lags recorded on both sides; fails when the two sides disagree
    pub fn matched_lags(&self) -> BookResult<Vec<Lag>> {
        let bids = self.lags(BookSide::Bid);
        let asks = self.lags(BookSide::Ask);
        let bid_set: BTreeSet<_> = bids.iter().collect();
        let ask_set: BTreeSet<_> = asks.iter().collect();
        if bid_set != ask_set {
            return Err(BookError::LagMismatch { bids, asks });
        }
        Ok(bids)
    }

    fn require(&self, time: SnapshotTime, side: BookSide) -> BookResult<&SideColumn> {
        self.column(time, side)
            .ok_or_else(|| BookError::MissingColumn(format!("{:?} {}", side, time)))
    }
}
