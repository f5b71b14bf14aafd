mod ladder;
mod results;
mod side;
mod snapshot;

pub use ladder::{MarketLevel, PriceLadder, PriceLevel};
pub use results::{ClearingPoint, PreCloseResult, UncrossResult};
pub use side::{BookSide, SideSelector};
pub use snapshot::{OrderBookSnapshot, SideColumn, SnapshotTime};
