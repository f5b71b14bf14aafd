use std::fmt;

use closing_core::{OrderBookSnapshot, SideSelector};
use closing_liquidity::{LiquidityRemover, MarketMode, Percent, RemovalPolicy};
use closing_ports::AuctionEngine;
use serde::{Deserialize, Serialize};

use super::Analysis;
use crate::error::UnitError;
use crate::results::SensitivityRow;

/// A liquidity-withdrawal scenario: which side loses which orders
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    BidLimit,
    AskLimit,
    AllLimit,
    BidMarket,
    AskMarket,
    AllMarket,
    BidCont,
    AskCont,
    AllCont,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::BidLimit,
        Scenario::AskLimit,
        Scenario::AllLimit,
        Scenario::BidMarket,
        Scenario::AskMarket,
        Scenario::AllMarket,
        Scenario::BidCont,
        Scenario::AskCont,
        Scenario::AllCont,
    ];

    pub fn side(&self) -> SideSelector {
        match self {
            Scenario::BidLimit | Scenario::BidMarket | Scenario::BidCont => SideSelector::Bid,
            Scenario::AskLimit | Scenario::AskMarket | Scenario::AskCont => SideSelector::Ask,
            Scenario::AllLimit | Scenario::AllMarket | Scenario::AllCont => SideSelector::Both,
        }
    }

    pub fn market_mode(&self) -> MarketMode {
        match self {
            Scenario::BidLimit | Scenario::AskLimit | Scenario::AllLimit => MarketMode::None,
            Scenario::BidMarket | Scenario::AskMarket | Scenario::AllMarket => {
                MarketMode::RemoveAll
            }
            Scenario::BidCont | Scenario::AskCont | Scenario::AllCont => {
                MarketMode::RemoveContinuous
            }
        }
    }

    /// Limit scenarios run the whole percent sweep
    pub fn sweeps_percents(&self) -> bool {
        self.market_mode() == MarketMode::None
    }

    /// Percents this scenario runs at; market scenarios run once, keyed at 1
    pub fn percents(&self, sweep: &[Percent]) -> Vec<Percent> {
        if self.sweeps_percents() {
            sweep.to_vec()
        } else {
            vec![Percent::ONE]
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::BidLimit => "bid_limit",
            Scenario::AskLimit => "ask_limit",
            Scenario::AllLimit => "all_limit",
            Scenario::BidMarket => "bid_market",
            Scenario::AskMarket => "ask_market",
            Scenario::AllMarket => "all_market",
            Scenario::BidCont => "bid_cont",
            Scenario::AskCont => "ask_cont",
            Scenario::AllCont => "all_cont",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uncross of the end-of-auction book after each removal scenario
pub struct SensitivityAnalysis<E> {
    engine: E,
    remover: LiquidityRemover<E>,
    scenarios: Vec<Scenario>,
    sweep: Vec<Percent>,
}

impl<E: AuctionEngine + Clone> SensitivityAnalysis<E> {
    pub fn new(
        engine: E,
        policy: RemovalPolicy,
        scenarios: Vec<Scenario>,
        sweep: Vec<Percent>,
    ) -> Self {
        Self {
            remover: LiquidityRemover::new(policy, engine.clone()),
            engine,
            scenarios,
            sweep,
        }
    }

    pub fn policy(&self) -> RemovalPolicy {
        self.remover.policy()
    }
}

impl<E: AuctionEngine + Clone> Analysis for SensitivityAnalysis<E> {
    type Row = SensitivityRow;

    fn name(&self) -> &'static str {
        "Sensitivity"
    }

    fn analyse(&self, snapshot: &OrderBookSnapshot) -> Result<Vec<SensitivityRow>, UnitError> {
        let key = snapshot.key();
        let close = self.engine.uncross(&snapshot.closing_ladder()?);

        let mut rows = Vec::new();
        for scenario in &self.scenarios {
            for percent in scenario.percents(&self.sweep) {
                let adjusted =
                    self.remover
                        .remove(snapshot, percent, scenario.side(), scenario.market_mode())?;
                let uncrossed = self.engine.uncross(&adjusted.ladder);

                rows.push(SensitivityRow::new(
                    *scenario,
                    key.date,
                    key.symbol.clone(),
                    percent.value(),
                    &close,
                    &uncrossed,
                ));
            }
        }

        log::debug!("{}: {} sensitivity rows", key, rows.len());
        Ok(rows)
    }
}
