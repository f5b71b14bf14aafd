use std::collections::HashMap;

use closing_core::{BookKey, Price};

/// Port for externally observed closing prices
pub trait ClosePriceSource: Send + Sync {
    /// Actual closing trade price of a book, if one was recorded
    fn close_price(&self, key: &BookKey) -> Option<Price>;
}

impl ClosePriceSource for HashMap<BookKey, Price> {
    fn close_price(&self, key: &BookKey) -> Option<Price> {
        self.get(key).copied()
    }
}

/// Source with no recorded prices; every lookup misses
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClosePrices;

impl ClosePriceSource for NoClosePrices {
    fn close_price(&self, _key: &BookKey) -> Option<Price> {
        None
    }
}
