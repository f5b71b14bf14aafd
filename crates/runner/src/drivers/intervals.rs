use closing_core::{Lag, OrderBookSnapshot, SnapshotTime};
use closing_ports::AuctionEngine;

use super::Analysis;
use crate::error::UnitError;
use crate::results::IntervalRow;

/// Uncross at every recorded lag of the closing window
///
/// Each lag is set against the uncross at the reference lag, so the rows show
/// how far the indicative price was from where the book ended up.
pub struct IntervalAnalysis<E> {
    engine: E,
    reference_lag: Lag,
}

impl<E: AuctionEngine> IntervalAnalysis<E> {
    pub fn new(engine: E, reference_lag: Lag) -> Self {
        Self {
            engine,
            reference_lag,
        }
    }
}

impl<E: AuctionEngine> Analysis for IntervalAnalysis<E> {
    type Row = IntervalRow;

    fn name(&self) -> &'static str {
        "Interval"
    }

    fn analyse(&self, snapshot: &OrderBookSnapshot) -> Result<Vec<IntervalRow>, UnitError> {
        let key = snapshot.key();
        let lags = snapshot.matched_lags()?;
        if !lags.contains(&self.reference_lag) {
            return Err(UnitError::MissingLag(self.reference_lag));
        }

        let reference = self
            .engine
            .uncross(&snapshot.ladder_at(SnapshotTime::Lag(self.reference_lag))?);

        lags.into_iter()
            .map(|lag| -> Result<IntervalRow, UnitError> {
                let snap = self.engine.uncross(&snapshot.ladder_at(SnapshotTime::Lag(lag))?);
                Ok(IntervalRow::new(
                    key.date,
                    key.symbol.clone(),
                    lag,
                    &reference,
                    &snap,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use closing_core::{BookError, BookKey, BookSide, SideColumn};
    use closing_matching::CumulativeDepthEngine;
    use rust_decimal_macros::dec;

    fn snapshot() -> OrderBookSnapshot {
        let key = BookKey::new(NaiveDate::from_ymd_opt(2019, 3, 15).unwrap(), "NESN");
        let mut snapshot =
            OrderBookSnapshot::new(key, vec![dec!(9.9), dec!(10.0), dec!(10.1)]).unwrap();

        // Bids build up over the window, asks stay put
        for (lag, bid_at_ten) in [(0, dec!(0)), (300, dec!(20)), (600, dec!(50))] {
            snapshot
                .insert_column(
                    SnapshotTime::Lag(lag),
                    BookSide::Bid,
                    SideColumn::new(dec!(0), vec![dec!(100), bid_at_ten, dec!(0)]),
                )
                .unwrap();
            snapshot
                .insert_column(
                    SnapshotTime::Lag(lag),
                    BookSide::Ask,
                    SideColumn::new(dec!(0), vec![dec!(0), dec!(80), dec!(60)]),
                )
                .unwrap();
        }
        snapshot
    }

    #[test]
    fn test_row_per_lag() {
        let analysis = IntervalAnalysis::new(CumulativeDepthEngine, 600);

        let rows = analysis.analyse(&snapshot()).unwrap();

        let lags: Vec<_> = rows.iter().map(|r| r.lag).collect();
        assert_eq!(lags, vec![0, 300, 600]);
        assert!(rows.iter().all(|r| r.close_price == Some(dec!(10.0))));
        assert!(rows.iter().all(|r| r.close_vol == Some(dec!(50))));

        // Lag 0: no bids at or above 10.0, nothing crosses
        assert_eq!(rows[0].snap_price, None);
        assert_eq!(rows[0].snap_bids, Some(dec!(100)));
        assert_eq!(rows[1].snap_vol, Some(dec!(20)));
        assert_eq!(rows[2].snap_cum_asks, Some(dec!(80)));
    }

    #[test]
    fn test_missing_reference_lag() {
        let analysis = IntervalAnalysis::new(CumulativeDepthEngine, 900);
        assert_eq!(
            analysis.analyse(&snapshot()).unwrap_err(),
            UnitError::MissingLag(900)
        );
    }

    #[test]
    fn test_mismatched_lags_fail_unit() {
        let mut snap = snapshot();
        snap.insert_column(SnapshotTime::Lag(450), BookSide::Bid, SideColumn::zeros(3))
            .unwrap();

        let analysis = IntervalAnalysis::new(CumulativeDepthEngine, 600);

        assert!(matches!(
            analysis.analyse(&snap),
            Err(UnitError::Book(BookError::LagMismatch { .. }))
        ));
    }
}
