//! Closing Matching Algorithms
//!
//! Closing auction price formation over a price ladder:
//!
//! - [`uncross`]: theoretical clearing price and volume at the close
//! - [`preclose`]: quoted spread of the limit book before the auction

mod cumulative_depth;
mod preclose;
mod uncross;

pub use cumulative_depth::CumulativeDepthEngine;
pub use preclose::preclose;
pub use uncross::uncross;

// Re-export the trait from ports for convenience
pub use closing_ports::{AuctionEngine, AuctionError, AuctionResult};
