use closing_core::{PreCloseResult, PriceLadder, UncrossResult};
use closing_ports::{AuctionEngine, AuctionResult};

/// Cumulative-depth closing auction engine
///
/// Uncrosses at the ladder level with the smallest gap between cumulative
/// demand and supply, and reads quoted spreads off the combined depth curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct CumulativeDepthEngine;

impl CumulativeDepthEngine {
    pub fn new() -> Self {
        Self
    }
}

impl AuctionEngine for CumulativeDepthEngine {
    fn uncross(&self, ladder: &PriceLadder) -> UncrossResult {
        crate::uncross(ladder)
    }

    fn preclose(&self, ladder: &PriceLadder) -> AuctionResult<PreCloseResult> {
        crate::preclose(ladder)
    }

    fn name(&self) -> &str {
        "Cumulative Depth"
    }
}
