//! Result rows of the analysis drivers
//!
//! Every driver produces flat rows keyed by (date, symbol, ...). Undefined
//! metrics stay `None` and export as empty cells or `null`.

use closing_core::{Lag, Price, PreCloseResult, Symbol, TradeDate, UncrossResult, Volume};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::drivers::Scenario;

/// A row the exporter can sort and round
pub trait ResultRow: Serialize + Send {
    type Key: Ord;

    fn key(&self) -> Self::Key;

    /// Copy with every numeric field rounded to `dp` decimals
    fn rounded(&self, dp: u32) -> Self;
}

/// Append-only collection of driver rows
#[derive(Debug, Clone)]
pub struct ResultTable<R> {
    rows: Vec<R>,
}

impl<R: ResultRow> ResultTable<R> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Rows sorted by key, rounded to `dp` decimals
    pub fn export_view(&self, dp: u32) -> Vec<R> {
        let mut rows: Vec<R> = self.rows.iter().map(|r| r.rounded(dp)).collect();
        rows.sort_by_key(|r| r.key());
        rows
    }
}

impl<R: ResultRow> Default for ResultTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ResultRow> FromIterator<R> for ResultTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R: ResultRow> Extend<R> for ResultTable<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

fn round(value: Option<Decimal>, dp: u32) -> Option<Decimal> {
    value.map(|v| v.round_dp(dp).normalize())
}

/// Baseline and adjusted uncross of one removal scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensitivityRow {
    pub mode: Scenario,
    pub date: TradeDate,
    pub symbol: Symbol,
    pub percent: Decimal,
    pub close_price: Option<Price>,
    pub close_vol: Option<Volume>,
    pub close_cum_bids: Option<Volume>,
    pub close_cum_asks: Option<Volume>,
    pub close_bids: Option<Volume>,
    pub close_asks: Option<Volume>,
    pub adj_price: Option<Price>,
    pub adj_vol: Option<Volume>,
    pub adj_cum_bids: Option<Volume>,
    pub adj_cum_asks: Option<Volume>,
    pub adj_bids: Option<Volume>,
    pub adj_asks: Option<Volume>,
}

impl SensitivityRow {
    pub fn new(
        mode: Scenario,
        date: TradeDate,
        symbol: Symbol,
        percent: Decimal,
        close: &UncrossResult,
        adjusted: &UncrossResult,
    ) -> Self {
        Self {
            mode,
            date,
            symbol,
            percent,
            close_price: close.price(),
            close_vol: close.traded_volume(),
            close_cum_bids: close.cum_bids(),
            close_cum_asks: close.cum_asks(),
            close_bids: close.total_bids,
            close_asks: close.total_asks,
            adj_price: adjusted.price(),
            adj_vol: adjusted.traded_volume(),
            adj_cum_bids: adjusted.cum_bids(),
            adj_cum_asks: adjusted.cum_asks(),
            adj_bids: adjusted.total_bids,
            adj_asks: adjusted.total_asks,
        }
    }
}

impl ResultRow for SensitivityRow {
    type Key = (Scenario, TradeDate, Symbol, Decimal);

    fn key(&self) -> Self::Key {
        (self.mode, self.date, self.symbol.clone(), self.percent)
    }

    fn rounded(&self, dp: u32) -> Self {
        Self {
            mode: self.mode,
            date: self.date,
            symbol: self.symbol.clone(),
            percent: self.percent.round_dp(dp).normalize(),
            close_price: round(self.close_price, dp),
            close_vol: round(self.close_vol, dp),
            close_cum_bids: round(self.close_cum_bids, dp),
            close_cum_asks: round(self.close_cum_asks, dp),
            close_bids: round(self.close_bids, dp),
            close_asks: round(self.close_asks, dp),
            adj_price: round(self.adj_price, dp),
            adj_vol: round(self.adj_vol, dp),
            adj_cum_bids: round(self.adj_cum_bids, dp),
            adj_cum_asks: round(self.adj_cum_asks, dp),
            adj_bids: round(self.adj_bids, dp),
            adj_asks: round(self.adj_asks, dp),
        }
    }
}

/// Price formation over the closing window of one (date, symbol)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryRow {
    pub date: TradeDate,
    pub symbol: Symbol,
    pub pre_abs_spread: Price,
    pub pre_midquote: Price,
    /// Basis points
    pub pre_rel_spread: Decimal,
    pub start_price: Option<Price>,
    pub start_vol: Option<Volume>,
    pub start_bids: Option<Volume>,
    pub start_asks: Option<Volume>,
    pub close_price: Option<Price>,
    pub close_vol: Option<Volume>,
    pub close_bids: Option<Volume>,
    pub close_asks: Option<Volume>,
    pub actual_close_price: Option<Price>,
}

impl DiscoveryRow {
    pub fn new(
        date: TradeDate,
        symbol: Symbol,
        preclose: &PreCloseResult,
        start: &UncrossResult,
        close: &UncrossResult,
        actual_close_price: Option<Price>,
    ) -> Self {
        Self {
            date,
            symbol,
            pre_abs_spread: preclose.abs_spread,
            pre_midquote: preclose.midquote,
            pre_rel_spread: preclose.rel_spread_bps,
            start_price: start.price(),
            start_vol: start.traded_volume(),
            start_bids: start.total_bids,
            start_asks: start.total_asks,
            close_price: close.price(),
            close_vol: close.traded_volume(),
            close_bids: close.total_bids,
            close_asks: close.total_asks,
            actual_close_price,
        }
    }
}

impl ResultRow for DiscoveryRow {
    type Key = (TradeDate, Symbol);

    fn key(&self) -> Self::Key {
        (self.date, self.symbol.clone())
    }

    fn rounded(&self, dp: u32) -> Self {
        Self {
            date: self.date,
            symbol: self.symbol.clone(),
            pre_abs_spread: self.pre_abs_spread.round_dp(dp).normalize(),
            pre_midquote: self.pre_midquote.round_dp(dp).normalize(),
            pre_rel_spread: self.pre_rel_spread.round_dp(dp).normalize(),
            start_price: round(self.start_price, dp),
            start_vol: round(self.start_vol, dp),
            start_bids: round(self.start_bids, dp),
            start_asks: round(self.start_asks, dp),
            close_price: round(self.close_price, dp),
            close_vol: round(self.close_vol, dp),
            close_bids: round(self.close_bids, dp),
            close_asks: round(self.close_asks, dp),
            actual_close_price: round(self.actual_close_price, dp),
        }
    }
}

/// Uncross of one lag against the reference lag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalRow {
    pub date: TradeDate,
    pub symbol: Symbol,
    pub lag: Lag,
    pub close_price: Option<Price>,
    pub close_vol: Option<Volume>,
    pub snap_price: Option<Price>,
    pub snap_vol: Option<Volume>,
    pub snap_bids: Option<Volume>,
    pub snap_asks: Option<Volume>,
    pub snap_cum_bids: Option<Volume>,
    pub snap_cum_asks: Option<Volume>,
}

impl IntervalRow {
    pub fn new(
        date: TradeDate,
        symbol: Symbol,
        lag: Lag,
        reference: &UncrossResult,
        snap: &UncrossResult,
    ) -> Self {
        Self {
            date,
            symbol,
            lag,
            close_price: reference.price(),
            close_vol: reference.traded_volume(),
            snap_price: snap.price(),
            snap_vol: snap.traded_volume(),
            snap_bids: snap.total_bids,
            snap_asks: snap.total_asks,
            snap_cum_bids: snap.cum_bids(),
            snap_cum_asks: snap.cum_asks(),
        }
    }
}

impl ResultRow for IntervalRow {
    type Key = (TradeDate, Symbol, Lag);

    fn key(&self) -> Self::Key {
        (self.date, self.symbol.clone(), self.lag)
    }

    fn rounded(&self, dp: u32) -> Self {
        Self {
            date: self.date,
            symbol: self.symbol.clone(),
            lag: self.lag,
            close_price: round(self.close_price, dp),
            close_vol: round(self.close_vol, dp),
            snap_price: round(self.snap_price, dp),
            snap_vol: round(self.snap_vol, dp),
            snap_bids: round(self.snap_bids, dp),
            snap_asks: round(self.snap_asks, dp),
            snap_cum_bids: round(self.snap_cum_bids, dp),
            snap_cum_asks: round(self.snap_cum_asks, dp),
        }
    }
}
