use std::fmt;
use std::str::FromStr;

use closing_core::{BookSide, PriceLadder, Volume};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RemovalError;
use crate::percent::Percent;

/// How much volume a percentage removal takes from each side ("base")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Percent of each side's own limit volume
    SeparatePassive,
    /// Percent of each side's limit plus market volume
    SeparateOrders,
    /// Bid limit volume plus half the percent of ask limit volume, on both sides
    FullPassive,
    /// Half the percent of all limit volume, capped by the side's limit volume
    FullLiquidity,
    /// Percent of the volume the unmodified book uncrosses
    CrossedVolume,
}

impl RemovalPolicy {
    pub const ALL: [RemovalPolicy; 5] = [
        RemovalPolicy::SeparatePassive,
        RemovalPolicy::SeparateOrders,
        RemovalPolicy::FullPassive,
        RemovalPolicy::FullLiquidity,
        RemovalPolicy::CrossedVolume,
    ];

    /// Whether targets depend on the uncrossed volume of the book
    pub fn needs_uncross(&self) -> bool {
        matches!(self, RemovalPolicy::CrossedVolume)
    }

    /// Volume to remove from each side
    ///
    /// `crossed_volume` is the traded volume of the unmodified book, zero when
    /// it does not uncross; only `CrossedVolume` reads it.
    pub fn targets(
        &self,
        ladder: &PriceLadder,
        percent: Percent,
        crossed_volume: Volume,
    ) -> SideAmounts {
        let p = percent.value();
        let bids = ladder.limit_volume(BookSide::Bid);
        let asks = ladder.limit_volume(BookSide::Ask);

        match self {
            RemovalPolicy::SeparatePassive => SideAmounts::new(bids * p, asks * p),
            RemovalPolicy::SeparateOrders => SideAmounts::new(
                ladder.total_volume(BookSide::Bid) * p,
                ladder.total_volume(BookSide::Ask) * p,
            ),
            RemovalPolicy::FullPassive => {
                // One target for both sides: all bid volume plus half the scaled asks
                let target = bids + asks * p / Decimal::TWO;
                SideAmounts::new(target, target)
            }
            RemovalPolicy::FullLiquidity => {
                let half = (bids + asks) * p / Decimal::TWO;
                SideAmounts::new(half.min(bids), half.min(asks))
            }
            RemovalPolicy::CrossedVolume => {
                SideAmounts::new(crossed_volume * p, crossed_volume * p)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::SeparatePassive => "SeparatePassive",
            RemovalPolicy::SeparateOrders => "SeparateOrders",
            RemovalPolicy::FullPassive => "FullPassive",
            RemovalPolicy::FullLiquidity => "FullLiquidity",
            RemovalPolicy::CrossedVolume => "CrossedVolume",
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalPolicy {
    type Err = RemovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace(['-', '_'], "").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().to_lowercase() == wanted)
            .ok_or_else(|| RemovalError::UnknownPolicy(s.to_string()))
    }
}

/// A volume per book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideAmounts {
    pub bids: Volume,
    pub asks: Volume,
}

impl SideAmounts {
    pub fn new(bids: Volume, asks: Volume) -> Self {
        Self { bids, asks }
    }

    pub fn get(&self, side: BookSide) -> Volume {
        match side {
            BookSide::Bid => self.bids,
            BookSide::Ask => self.asks,
        }
    }

    pub fn set(&mut self, side: BookSide, volume: Volume) {
        match side {
            BookSide::Bid => self.bids = volume,
            BookSide::Ask => self.asks = volume,
        }
    }
}
