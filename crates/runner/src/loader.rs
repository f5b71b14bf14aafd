//! CSV input
//!
//! The snapshot file is long in (date, symbol, price) and wide in time: one
//! row per price level, one volume column per side and snapshot time.
//!
//! | column                          | meaning                             |
//! |---------------------------------|-------------------------------------|
//! | `onbook_date`                   | trading date, `YYYY-MM-DD`          |
//! | `symbol`                        | security                            |
//! | `price`                         | limit price, `0` for market orders  |
//! | `end_close_vol_bid` / `_ask`    | end-of-auction book                 |
//! | `start_close_vol_bid` / `_ask`  | start of the auction (lag 0)        |
//! | `SS_<lag>_vol_bid` / `_ask`     | book `<lag>` seconds into the window |
//!
//! Empty or `NaN` volume cells count as zero.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use closing_core::{
    BookKey, BookSide, Lag, OrderBookSnapshot, Price, SideColumn, SnapshotTime, Volume,
};
use closing_ports::ClosePriceSource;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::LoadError;

type LoadResult<T> = std::result::Result<T, LoadError>;

const DATE: &str = "onbook_date";
const SYMBOL: &str = "symbol";
const PRICE: &str = "price";

/// A volume column and the book slot it feeds
#[derive(Debug, Clone)]
struct VolumeColumn {
    index: usize,
    name: String,
    time: SnapshotTime,
    side: BookSide,
}

#[derive(Debug)]
struct Layout {
    date: usize,
    symbol: usize,
    price: usize,
    volumes: Vec<VolumeColumn>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> LoadResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        let mut volumes: Vec<VolumeColumn> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let Some((time, side)) = volume_slot(header.trim()) else {
                continue;
            };
            if volumes.iter().any(|v| v.time == time && v.side == side) {
                return Err(LoadError::DuplicateColumn(header.to_string()));
            }
            volumes.push(VolumeColumn {
                index,
                name: header.trim().to_string(),
                time,
                side,
            });
        }

        for side in ["bid", "ask"] {
            let name = format!("end_close_vol_{}", side);
            find(&name)?;
        }

        Ok(Self {
            date: find(DATE)?,
            symbol: find(SYMBOL)?,
            price: find(PRICE)?,
            volumes,
        })
    }
}

/// Book slot of a volume column header, `None` for any other column
fn volume_slot(header: &str) -> Option<(SnapshotTime, BookSide)> {
    let (stem, side) = if let Some(stem) = header.strip_suffix("_vol_bid") {
        (stem, BookSide::Bid)
    } else if let Some(stem) = header.strip_suffix("_vol_ask") {
        (stem, BookSide::Ask)
    } else {
        return None;
    };

    let time = match stem {
        "end_close" => SnapshotTime::Close,
        "start_close" => SnapshotTime::START,
        _ => SnapshotTime::Lag(stem.strip_prefix("SS_")?.parse::<Lag>().ok()?),
    };
    Some((time, side))
}

fn parse_volume(raw: &str, line: u64, field: &str) -> LoadResult<Volume> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(Decimal::ZERO);
    }
    parse_decimal(raw, line, field)
}

fn parse_decimal(raw: &str, line: u64, field: &str) -> LoadResult<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| LoadError::InvalidValue {
            line,
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn parse_date(raw: &str, line: u64) -> LoadResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| LoadError::InvalidValue {
        line,
        field: DATE.to_string(),
        value: raw.to_string(),
    })
}

/// Rows of one (date, symbol) before they become a snapshot
#[derive(Debug, Default)]
struct PendingBook {
    market: Option<Vec<Volume>>,
    levels: BTreeMap<Price, Vec<Volume>>,
}

impl PendingBook {
    fn build(self, key: BookKey, layout: &Layout) -> LoadResult<OrderBookSnapshot> {
        let book_error = |source| LoadError::Book {
            key: key.clone(),
            source,
        };

        let prices: Vec<Price> = self.levels.keys().copied().collect();
        let mut snapshot = OrderBookSnapshot::new(key.clone(), prices).map_err(book_error)?;

        for (j, column) in layout.volumes.iter().enumerate() {
            let market = self.market.as_ref().map_or(Decimal::ZERO, |m| m[j]);
            let limits = self.levels.values().map(|v| v[j]).collect();
            snapshot
                .insert_column(column.time, column.side, SideColumn::new(market, limits))
                .map_err(book_error)?;
        }

        Ok(snapshot)
    }
}

/// Order book snapshots of every (date, symbol), sorted by key
#[derive(Debug, Clone, Default)]
pub struct SnapshotBook {
    snapshots: Vec<OrderBookSnapshot>,
}

impl SnapshotBook {
    pub fn from_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if let Ok(meta) = file.metadata() {
            log::info!("Reading snapshots from {:?} ({} bytes)", path, meta.len());
        }

        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> LoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let layout = Layout::from_headers(reader.headers()?)?;

        let mut pending: BTreeMap<BookKey, PendingBook> = BTreeMap::new();
        let mut rows = 0usize;

        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let field = |index: usize| record.get(index).unwrap_or("");

            let date = parse_date(field(layout.date), line)?;
            let symbol = field(layout.symbol).to_string();
            let price = parse_decimal(field(layout.price), line, PRICE)?.normalize();
            if price < Decimal::ZERO {
                return Err(LoadError::InvalidValue {
                    line,
                    field: PRICE.to_string(),
                    value: price.to_string(),
                });
            }

            let volumes = layout
                .volumes
                .iter()
                .map(|column| parse_volume(field(column.index), line, &column.name))
                .collect::<LoadResult<Vec<_>>>()?;

            let key = BookKey::new(date, symbol);
            let book = pending.entry(key.clone()).or_default();
            let duplicate = if price.is_zero() {
                book.market.replace(volumes).is_some()
            } else {
                book.levels.insert(price, volumes).is_some()
            };
            if duplicate {
                return Err(LoadError::DuplicateRow {
                    line,
                    key,
                    price: price.to_string(),
                });
            }
            rows += 1;
        }

        let snapshots = pending
            .into_iter()
            .map(|(key, book)| book.build(key, &layout))
            .collect::<LoadResult<Vec<_>>>()?;

        let lags = layout
            .volumes
            .iter()
            .filter(|v| v.side == BookSide::Bid && v.time != SnapshotTime::Close)
            .count();
        log::info!(
            "Loaded {} rows into {} books ({} lag snapshots per side)",
            rows,
            snapshots.len(),
            lags
        );

        Ok(Self { snapshots })
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[OrderBookSnapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderBookSnapshot> {
        self.snapshots.iter()
    }

    pub fn get(&self, key: &BookKey) -> Option<&OrderBookSnapshot> {
        self.snapshots
            .binary_search_by(|s| s.key().cmp(key))
            .ok()
            .map(|i| &self.snapshots[i])
    }
}

impl FromIterator<OrderBookSnapshot> for SnapshotBook {
    fn from_iter<I: IntoIterator<Item = OrderBookSnapshot>>(iter: I) -> Self {
        let mut snapshots: Vec<_> = iter.into_iter().collect();
        snapshots.sort_by(|a, b| a.key().cmp(b.key()));
        Self { snapshots }
    }
}

#[derive(Debug, Deserialize)]
struct ClosePriceRecord {
    onbook_date: NaiveDate,
    symbol: String,
    price_org_ccy: String,
}

/// Observed closing prices by (date, symbol)
#[derive(Debug, Clone, Default)]
pub struct ClosePrices {
    prices: HashMap<BookKey, Price>,
}

impl ClosePrices {
    pub fn from_path(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Reading closing prices from {:?}", path);

        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> LoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        let mut prices = HashMap::new();
        let mut missing = 0usize;

        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let row: ClosePriceRecord = record.deserialize(Some(&headers))?;

            let key = BookKey::new(row.onbook_date, row.symbol);
            if row.price_org_ccy.is_empty() || row.price_org_ccy.eq_ignore_ascii_case("nan") {
                missing += 1;
                continue;
            }
            let price = parse_decimal(&row.price_org_ccy, line, "price_org_ccy")?;
            if prices.insert(key.clone(), price).is_some() {
                return Err(LoadError::DuplicateClose { line, key });
            }
        }

        log::info!(
            "Loaded {} closing prices ({} without a price)",
            prices.len(),
            missing
        );
        Ok(Self { prices })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl ClosePriceSource for ClosePrices {
    fn close_price(&self, key: &BookKey) -> Option<Price> {
        self.prices.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SNAPSHOTS: &str = "\
onbook_date,symbol,price,start_close_vol_bid,start_close_vol_ask,SS_300_vol_bid,SS_300_vol_ask,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,0,5,,8,,40,
2019-03-15,NESN,10.0,50,,50,80,50,80
2019-03-15,NESN,9.9,100,,100,,100,
2019-03-15,NESN,10.1,,60,,60,,60
2019-03-14,ABBN,20,10,0,10,0,10,0
2019-03-14,ABBN,21,0,10,0,10,0,NaN
";

    fn nesn() -> BookKey {
        BookKey::new(NaiveDate::from_ymd_opt(2019, 3, 15).unwrap(), "NESN")
    }

    #[test]
    fn test_volume_slots() {
        assert_eq!(
            volume_slot("end_close_vol_bid"),
            Some((SnapshotTime::Close, BookSide::Bid))
        );
        assert_eq!(
            volume_slot("start_close_vol_ask"),
            Some((SnapshotTime::START, BookSide::Ask))
        );
        assert_eq!(
            volume_slot("SS_450_vol_bid"),
            Some((SnapshotTime::Lag(450), BookSide::Bid))
        );
        assert_eq!(volume_slot("SS_x_vol_bid"), None);
        assert_eq!(volume_slot("price"), None);
    }

    #[test]
    fn test_load_snapshots() {
        let book = SnapshotBook::from_reader(SNAPSHOTS.as_bytes()).unwrap();

        assert_eq!(book.len(), 2);
        // Sorted by (date, symbol)
        assert_eq!(book.snapshots()[0].key().symbol, "ABBN");

        let snapshot = book.get(&nesn()).unwrap();
        assert_eq!(snapshot.prices(), &[dec!(9.9), dec!(10.0), dec!(10.1)]);

        let close = snapshot.closing_ladder().unwrap();
        assert_eq!(close.market().bid, dec!(40));
        assert_eq!(close.market().ask, dec!(0));
        assert_eq!(close.levels()[1].ask, dec!(80));

        let start = snapshot.ladder_at(SnapshotTime::START).unwrap();
        assert_eq!(start.market().bid, dec!(5));
        assert_eq!(start.levels()[1].ask, dec!(0));

        assert_eq!(snapshot.matched_lags().unwrap(), vec![0, 300]);
    }

    #[test]
    fn test_nan_is_zero() {
        let book = SnapshotBook::from_reader(SNAPSHOTS.as_bytes()).unwrap();
        let abbn = &book.snapshots()[0];
        assert_eq!(abbn.closing_ladder().unwrap().levels()[1].ask, dec!(0));
    }

    #[test]
    fn test_missing_end_column() {
        let data = "onbook_date,symbol,price,end_close_vol_bid\n2019-03-15,NESN,10,1\n";
        let err = SnapshotBook::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "end_close_vol_ask"));
    }

    #[test]
    fn test_duplicate_price_row() {
        let data = "\
onbook_date,symbol,price,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,10,1,0
2019-03-15,NESN,10.00,2,0
";
        let err = SnapshotBook::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateRow { line: 3, .. }));
    }

    #[test]
    fn test_invalid_volume() {
        let data = "\
onbook_date,symbol,price,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,10,abc,0
";
        let err = SnapshotBook::from_reader(data.as_bytes()).unwrap_err();
        assert!(
            matches!(err, LoadError::InvalidValue { line: 2, ref field, .. } if field == "end_close_vol_bid")
        );
    }

    #[test]
    fn test_negative_volume_rejected() {
        let data = "\
onbook_date,symbol,price,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,10,-5,0
";
        let err = SnapshotBook::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Book { .. }));
    }

    #[test]
    fn test_scientific_volume() {
        let data = "\
onbook_date,symbol,price,end_close_vol_bid,end_close_vol_ask
2019-03-15,NESN,10,1.5e3,0
";
        let book = SnapshotBook::from_reader(data.as_bytes()).unwrap();
        let ladder = book.snapshots()[0].closing_ladder().unwrap();
        assert_eq!(ladder.levels()[0].bid, dec!(1500));
    }

    #[test]
    fn test_close_prices() {
        let data = "\
onbook_date,symbol,price_org_ccy
2019-03-15,NESN,100.25
2019-03-15,UBSG,
";
        let closes = ClosePrices::from_reader(data.as_bytes()).unwrap();

        assert_eq!(closes.len(), 1);
        assert_eq!(closes.close_price(&nesn()), Some(dec!(100.25)));
        assert_eq!(
            closes.close_price(&BookKey::new(nesn().date, "UBSG")),
            None
        );
    }

    #[test]
    fn test_duplicate_close_price() {
        let data = "\
onbook_date,symbol,price_org_ccy
2019-03-15,NESN,100.25
2019-03-15,NESN,100.30
";
        let err = ClosePrices::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateClose { .. }));
    }
}
