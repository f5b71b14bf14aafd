use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::side::BookSide;
use crate::error::{BookError, BookResult};
use crate::values::{Price, Volume};

/// Aggregated unpriced (market) orders of one book
///
/// Input files carry these as rows at price `0`. They are kept apart from the
/// limit ladder so a real price can never collide with the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketLevel {
    pub bid: Volume,
    pub ask: Volume,
}

impl MarketLevel {
    pub fn new(bid: Volume, ask: Volume) -> Self {
        Self { bid, ask }
    }

    pub fn volume(&self, side: BookSide) -> Volume {
        match side {
            BookSide::Bid => self.bid,
            BookSide::Ask => self.ask,
        }
    }
}

/// Resting limit volume on both sides at one price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub bid: Volume,
    pub ask: Volume,
}

impl PriceLevel {
    pub fn new(price: Price, bid: Volume, ask: Volume) -> Self {
        Self { price, bid, ask }
    }

    pub fn volume(&self, side: BookSide) -> Volume {
        match side {
            BookSide::Bid => self.bid,
            BookSide::Ask => self.ask,
        }
    }

    fn volume_mut(&mut self, side: BookSide) -> &mut Volume {
        match side {
            BookSide::Bid => &mut self.bid,
            BookSide::Ask => &mut self.ask,
        }
    }
}

/// Price ladder of a closing auction book
///
/// Invariants (checked by [`PriceLadder::new`]):
/// - limit levels sorted strictly ascending by price
/// - every limit price is positive
/// - no negative volume anywhere
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceLadder {
    market: MarketLevel,
    levels: Vec<PriceLevel>,
}

impl PriceLadder {
    /// Build a ladder, sorting the limit levels by price
    pub fn new(market: MarketLevel, mut levels: Vec<PriceLevel>) -> BookResult<Self> {
        check_volume(Decimal::ZERO, market.bid)?;
        check_volume(Decimal::ZERO, market.ask)?;

        levels.sort_by(|a, b| a.price.cmp(&b.price));
        for level in &levels {
            if level.price <= Decimal::ZERO {
                return Err(BookError::NonPositivePrice(level.price));
            }
            check_volume(level.price, level.bid)?;
            check_volume(level.price, level.ask)?;
        }
        if let Some(pair) = levels.windows(2).find(|w| w[0].price == w[1].price) {
            return Err(BookError::DuplicatePrice(pair[0].price));
        }

        Ok(Self { market, levels })
    }

    /// Ladder with limit levels only, no market orders
    pub fn limit_only(levels: Vec<PriceLevel>) -> BookResult<Self> {
        Self::new(MarketLevel::default(), levels)
    }

    pub fn market(&self) -> MarketLevel {
        self.market
    }

    /// Limit levels, ascending by price
    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Limit volumes of one side, ascending by price
    pub fn limit_volumes(&self, side: BookSide) -> impl Iterator<Item = Volume> + '_ {
        self.levels.iter().map(move |l| l.volume(side))
    }

    /// Sum of resting limit volume on one side (passive volume)
    pub fn limit_volume(&self, side: BookSide) -> Volume {
        self.limit_volumes(side).sum()
    }

    pub fn market_volume(&self, side: BookSide) -> Volume {
        self.market.volume(side)
    }

    /// Market plus limit volume on one side
    pub fn total_volume(&self, side: BookSide) -> Volume {
        self.market_volume(side) + self.limit_volume(side)
    }

    /// Overwrite the market volume of one side, clamped at zero
    pub fn set_market_volume(&mut self, side: BookSide, volume: Volume) {
        let volume = volume.max(Decimal::ZERO);
        match side {
            BookSide::Bid => self.market.bid = volume,
            BookSide::Ask => self.market.ask = volume,
        }
    }

    /// Mutable volume slots of one side: market level first, then limit
    /// levels from the lowest price upward
    pub fn volumes_mut(&mut self, side: BookSide) -> impl Iterator<Item = &mut Volume> + '_ {
        let market = match side {
            BookSide::Bid => &mut self.market.bid,
            BookSide::Ask => &mut self.market.ask,
        };
        std::iter::once(market).chain(self.levels.iter_mut().map(move |l| l.volume_mut(side)))
    }
}

fn check_volume(price: Price, volume: Volume) -> BookResult<()> {
    if volume < Decimal::ZERO {
        return Err(BookError::NegativeVolume { price, volume });
    }
    Ok(())
}
