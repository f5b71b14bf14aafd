use closing_core::{BookSide, ClearingPoint, PriceLadder, UncrossResult, Volume};
use rust_decimal::Decimal;

/// Cumulative depth of both sides at one limit level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Depth {
    /// Market bids plus limit bids at or above the level
    bids: Volume,
    /// Market asks plus limit asks at or below the level
    asks: Volume,
}

impl Depth {
    fn imbalance(&self) -> Volume {
        (self.bids - self.asks).abs()
    }

    fn matched(&self) -> Volume {
        self.bids.min(self.asks)
    }
}

/// Uncross a closing auction book
///
/// Market orders are eligible at every price. Bids execute at their limit or
/// above, asks at their limit or below. The clearing level is the one with the
/// smallest absolute imbalance between cumulative bids and asks; on ties the
/// lowest price wins.
pub fn uncross(ladder: &PriceLadder) -> UncrossResult {
    let limit_bids = ladder.limit_volume(BookSide::Bid);
    let limit_asks = ladder.limit_volume(BookSide::Ask);

    // One-sided book: nothing to match, totals are not reported either
    if limit_bids.is_zero() || limit_asks.is_zero() {
        return UncrossResult::undefined();
    }

    let depth = cumulative_depth(ladder, limit_bids);

    let total_bids = depth.iter().map(|d| d.bids).max();
    let total_asks = depth.iter().map(|d| d.asks).max();

    // min_by_key keeps the first of equal minima
    let Some((index, at_clearing)) = depth
        .iter()
        .enumerate()
        .min_by_key(|(_, d)| d.imbalance())
    else {
        return UncrossResult::undefined();
    };

    let volume = at_clearing.matched();
    if volume.is_zero() {
        return UncrossResult {
            clearing: None,
            total_bids,
            total_asks,
        };
    }

    UncrossResult {
        clearing: Some(ClearingPoint {
            price: ladder.levels()[index].price,
            volume,
            cum_bids: at_clearing.bids,
            cum_asks: at_clearing.asks,
        }),
        total_bids,
        total_asks,
    }
}

fn cumulative_depth(ladder: &PriceLadder, limit_bids: Volume) -> Vec<Depth> {
    let market = ladder.market();
    let mut bids_below = Decimal::ZERO;
    let mut asks = market.ask;

    ladder
        .levels()
        .iter()
        .map(|level| {
            asks += level.ask;
            let depth = Depth {
                bids: market.bid + limit_bids - bids_below,
                asks,
            };
            bids_below += level.bid;
            depth
        })
        .collect()
}
