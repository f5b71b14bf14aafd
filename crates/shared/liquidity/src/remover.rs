//! Liquidity-removal simulation
//!
//! Builds an adjusted end-of-auction book by withdrawing volume from it, to
//! measure how sensitive the uncrossing is to liquidity that might not show up.
//!
//! Precedence of removal modes:
//!
//! 1. `MarketMode::RemoveAll` - zero the market orders of the selected side(s)
//! 2. `MarketMode::RemoveContinuous` - take out the market orders that were
//!    already resting at the start of the auction
//! 3. percentage removal - deplete the target volume of the policy, market
//!    level first, then limit levels from the lowest price upward
//!
//! The upward walk removes the worst bids first but the best asks first. The
//! asymmetry moves the clearing price and is part of the model.

use closing_core::{
    BookSide, OrderBookSnapshot, PriceLadder, SideSelector, SnapshotTime, Volume,
};
use closing_ports::AuctionEngine;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::market_mode::MarketMode;
use crate::percent::Percent;
use crate::policy::{RemovalPolicy, SideAmounts};

/// End-of-auction book after a removal scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedBook {
    pub ladder: PriceLadder,
    /// Volume the scenario set out to remove
    pub targets: SideAmounts,
    /// Volume actually removed; below target only when a side ran dry
    pub removed: SideAmounts,
}

impl AdjustedBook {
    fn unchanged(ladder: PriceLadder) -> Self {
        Self {
            ladder,
            targets: SideAmounts::default(),
            removed: SideAmounts::default(),
        }
    }
}

/// Applies removal scenarios under one fixed policy
#[derive(Debug, Clone)]
pub struct LiquidityRemover<E> {
    policy: RemovalPolicy,
    engine: E,
}

impl<E: AuctionEngine> LiquidityRemover<E> {
    /// `engine` uncrosses the unmodified book for `CrossedVolume` targets
    pub fn new(policy: RemovalPolicy, engine: E) -> Self {
        Self { policy, engine }
    }

    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Adjusted end-of-auction book of `snapshot`
    ///
    /// `percent` only applies when `market` is `MarketMode::None`; zero returns
    /// the book unchanged.
    pub fn remove(
        &self,
        snapshot: &OrderBookSnapshot,
        percent: Percent,
        side: SideSelector,
        market: MarketMode,
    ) -> Result<AdjustedBook> {
        let ladder = snapshot.closing_ladder()?;

        let adjusted = match market {
            MarketMode::RemoveAll => remove_all_market(ladder, side),
            MarketMode::RemoveContinuous => remove_continuous_market(snapshot, ladder, side),
            MarketMode::None if percent.is_zero() => AdjustedBook::unchanged(ladder),
            MarketMode::None => self.remove_percent(ladder, percent, side),
        };

        log::debug!(
            "{} {} side={:?} market={} p={}: removed bids={} asks={}",
            snapshot.key(),
            self.policy,
            side,
            market,
            percent,
            adjusted.removed.bids,
            adjusted.removed.asks
        );

        Ok(adjusted)
    }

    fn remove_percent(
        &self,
        mut ladder: PriceLadder,
        percent: Percent,
        side: SideSelector,
    ) -> AdjustedBook {
        let crossed_volume = if self.policy.needs_uncross() {
            self.engine
                .uncross(&ladder)
                .traded_volume()
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let policy_targets = self.policy.targets(&ladder, percent, crossed_volume);
        let mut targets = SideAmounts::default();
        let mut removed = SideAmounts::default();
        for s in side.sides() {
            let target = policy_targets.get(s);
            targets.set(s, target);
            removed.set(s, deplete(&mut ladder, s, target));
        }

        AdjustedBook {
            ladder,
            targets,
            removed,
        }
    }
}

fn remove_all_market(mut ladder: PriceLadder, side: SideSelector) -> AdjustedBook {
    let mut removed = SideAmounts::default();
    for s in side.sides() {
        removed.set(s, ladder.market_volume(s));
        ladder.set_market_volume(s, Decimal::ZERO);
    }

    AdjustedBook {
        ladder,
        targets: removed,
        removed,
    }
}

fn remove_continuous_market(
    snapshot: &OrderBookSnapshot,
    mut ladder: PriceLadder,
    side: SideSelector,
) -> AdjustedBook {
    let mut removed = SideAmounts::default();
    for s in side.sides() {
        // No start-of-auction book: nothing known to be continuous
        let Some(start) = snapshot.column(SnapshotTime::START, s) else {
            continue;
        };
        let end = ladder.market_volume(s);
        let remaining = (end - start.market).max(Decimal::ZERO);
        ladder.set_market_volume(s, remaining);
        removed.set(s, end - remaining);
    }

    AdjustedBook {
        ladder,
        targets: removed,
        removed,
    }
}

/// Take up to `target` from one side, market level first, then whole limit
/// levels from the lowest price upward. Returns the volume removed.
fn deplete(ladder: &mut PriceLadder, side: BookSide, target: Volume) -> Volume {
    let mut remaining = target;
    for slot in ladder.volumes_mut(side) {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taken = (*slot).min(remaining);
        *slot -= taken;
        remaining -= taken;
    }
    target - remaining.max(Decimal::ZERO)
}
