use closing_core::{OrderBookSnapshot, SnapshotTime};
use closing_ports::{AuctionEngine, ClosePriceSource};

use super::Analysis;
use crate::error::UnitError;
use crate::results::DiscoveryRow;

/// Price formation from the last continuous book to the auction close
///
/// The start-of-auction book yields the quoted spread and a first uncross,
/// the end-of-auction book the theoretical close. Both are set against the
/// observed closing price when one is known.
pub struct DiscoveryAnalysis<E, C> {
    engine: E,
    close_prices: C,
}

impl<E: AuctionEngine, C: ClosePriceSource> DiscoveryAnalysis<E, C> {
    pub fn new(engine: E, close_prices: C) -> Self {
        Self {
            engine,
            close_prices,
        }
    }
}

impl<E: AuctionEngine, C: ClosePriceSource> Analysis for DiscoveryAnalysis<E, C> {
    type Row = DiscoveryRow;

    fn name(&self) -> &'static str {
        "Price discovery"
    }

    fn analyse(&self, snapshot: &OrderBookSnapshot) -> Result<Vec<DiscoveryRow>, UnitError> {
        let key = snapshot.key();
        let start_book = snapshot.ladder_at(SnapshotTime::START)?;
        let close_book = snapshot.closing_ladder()?;

        let preclose = self.engine.preclose(&start_book)?;
        let start = self.engine.uncross(&start_book);
        let close = self.engine.uncross(&close_book);
        let actual = self.close_prices.close_price(key);

        if actual.is_none() {
            log::debug!("{}: no observed closing price", key);
        }

        Ok(vec![DiscoveryRow::new(
            key.date,
            key.symbol.clone(),
            &preclose,
            &start,
            &close,
            actual,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use closing_core::{BookKey, BookSide, Price, SideColumn};
    use closing_matching::CumulativeDepthEngine;
    use closing_ports::{AuctionError, NoClosePrices};
    use rust_decimal_macros::dec;

    fn key() -> BookKey {
        BookKey::new(NaiveDate::from_ymd_opt(2019, 3, 15).unwrap(), "NESN")
    }

    fn snapshot(start_bids: Vec<Price>, start_asks: Vec<Price>) -> OrderBookSnapshot {
        OrderBookSnapshot::new(key(), vec![dec!(99.0), dec!(99.5), dec!(100.5), dec!(101.0)])
            .unwrap()
            .with_column(
                SnapshotTime::START,
                BookSide::Bid,
                SideColumn::new(dec!(0), start_bids),
            )
            .unwrap()
            .with_column(
                SnapshotTime::START,
                BookSide::Ask,
                SideColumn::new(dec!(0), start_asks),
            )
            .unwrap()
            .with_column(
                SnapshotTime::Close,
                BookSide::Bid,
                SideColumn::new(dec!(0), vec![dec!(300), dec!(200), dec!(50), dec!(0)]),
            )
            .unwrap()
            .with_column(
                SnapshotTime::Close,
                BookSide::Ask,
                SideColumn::new(dec!(0), vec![dec!(0), dec!(100), dec!(150), dec!(400)]),
            )
            .unwrap()
    }

    fn quoted() -> OrderBookSnapshot {
        snapshot(
            vec![dec!(300), dec!(200), dec!(0), dec!(0)],
            vec![dec!(0), dec!(0), dec!(150), dec!(400)],
        )
    }

    #[test]
    fn test_discovery_row() {
        let closes = HashMap::from([(key(), dec!(100.25))]);
        let analysis = DiscoveryAnalysis::new(CumulativeDepthEngine, closes);

        let rows = analysis.analyse(&quoted()).unwrap();
        let row = &rows[0];

        assert_eq!(row.pre_abs_spread, dec!(1.0));
        assert_eq!(row.pre_midquote, dec!(100.0));
        assert_eq!(row.pre_rel_spread, dec!(100));
        // Start book does not cross
        assert_eq!(row.start_price, None);
        assert_eq!(row.start_bids, Some(dec!(500)));
        assert_eq!(row.start_asks, Some(dec!(550)));
        // Close: bids 550/250/50/0 against asks 0/100/250/650
        assert_eq!(row.close_price, Some(dec!(99.5)));
        assert_eq!(row.close_vol, Some(dec!(100)));
        assert_eq!(row.actual_close_price, Some(dec!(100.25)));
    }

    #[test]
    fn test_missing_close_price_is_undefined() {
        let analysis = DiscoveryAnalysis::new(CumulativeDepthEngine, NoClosePrices);
        let rows = analysis.analyse(&quoted()).unwrap();
        assert_eq!(rows[0].actual_close_price, None);
    }

    #[test]
    fn test_crossed_start_book_fails_unit() {
        let analysis = DiscoveryAnalysis::new(CumulativeDepthEngine, NoClosePrices);
        let crossed = snapshot(
            vec![dec!(0), dec!(0), dec!(0), dec!(100)],
            vec![dec!(100), dec!(0), dec!(0), dec!(0)],
        );

        let err = analysis.analyse(&crossed).unwrap_err();

        assert!(matches!(
            err,
            UnitError::Auction(AuctionError::SpreadInversion { .. })
        ));
    }
}
