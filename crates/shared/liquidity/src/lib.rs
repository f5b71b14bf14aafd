//! Closing Liquidity
//!
//! Liquidity-removal simulation for closing-auction books: which volume a
//! withdrawal scenario takes out of the end-of-auction book, and in what order.

mod error;
mod market_mode;
mod percent;
mod policy;
mod remover;

pub use error::{RemovalError, Result};
pub use market_mode::MarketMode;
pub use percent::Percent;
pub use policy::{RemovalPolicy, SideAmounts};
pub use remover::{AdjustedBook, LiquidityRemover};
