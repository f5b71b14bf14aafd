use closing_core::{PreCloseResult, Price, PriceLadder};
use closing_ports::{AuctionError, AuctionResult};
use rust_decimal::Decimal;

const BPS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
const ROUND_DP: u32 = 4;

/// Quoted spread of the limit-order book
///
/// Cumulative bids (summed upward) plus cumulative asks (summed downward)
/// peak on the range between the best bid and the best ask. The first peak
/// level is the best bid, the last one the best ask. Market orders are ignored.
///
/// Fails when no limit levels exist, or when a bid rests above an ask: a
/// crossed continuous book has no quoted spread.
pub fn preclose(ladder: &PriceLadder) -> AuctionResult<PreCloseResult> {
    let levels = ladder.levels();
    if levels.is_empty() {
        return Err(AuctionError::NoLimitLevels);
    }

    let highest_bid = levels.iter().rposition(|l| l.bid > Decimal::ZERO);
    let lowest_ask = levels.iter().position(|l| l.ask > Decimal::ZERO);
    if let (Some(bid), Some(ask)) = (highest_bid, lowest_ask) {
        if bid > ask {
            return Err(AuctionError::SpreadInversion {
                best_bid: levels[bid].price,
                best_ask: levels[ask].price,
            });
        }
    }

    let combined = combined_depth(ladder);
    let peak = combined.iter().copied().max().unwrap_or(Decimal::ZERO);
    let top_bid = combined.iter().position(|d| *d == peak).unwrap_or(0);
    let top_ask = combined.iter().rposition(|d| *d == peak).unwrap_or(0);

    Ok(quote(levels[top_bid].price, levels[top_ask].price))
}

fn combined_depth(ladder: &PriceLadder) -> Vec<Decimal> {
    let total_asks: Decimal = ladder.levels().iter().map(|l| l.ask).sum();
    let mut bids = Decimal::ZERO;
    let mut asks_below = Decimal::ZERO;

    ladder
        .levels()
        .iter()
        .map(|level| {
            bids += level.bid;
            let asks = total_asks - asks_below;
            asks_below += level.ask;
            bids + asks
        })
        .collect()
}

fn quote(best_bid: Price, best_ask: Price) -> PreCloseResult {
    let spread = best_ask - best_bid;
    let midquote = (best_bid + best_ask) / Decimal::TWO;

    PreCloseResult {
        best_bid,
        best_ask,
        abs_spread: spread.round_dp(ROUND_DP),
        midquote: midquote.round_dp(ROUND_DP),
        rel_spread_bps: (spread / midquote * BPS).round_dp(ROUND_DP),
    }
}
