use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RemovalError;

/// Treatment of market (unpriced) orders in a removal scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMode {
    /// Percentage removal over market and limit orders
    #[default]
    None,
    /// Drop every market order on the selected side(s)
    #[serde(alias = "all")]
    RemoveAll,
    /// Drop only the market orders already resting when the auction started
    #[serde(alias = "cont")]
    RemoveContinuous,
}

impl fmt::Display for MarketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketMode::None => "none",
            MarketMode::RemoveAll => "all",
            MarketMode::RemoveContinuous => "cont",
        };
        f.write_str(name)
    }
}

impl FromStr for MarketMode {
    type Err = RemovalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(MarketMode::None),
            "all" | "remove_all" | "remove-all" => Ok(MarketMode::RemoveAll),
            "cont" | "remove_continuous" | "remove-continuous" => {
                Ok(MarketMode::RemoveContinuous)
            }
            _ => Err(RemovalError::UnknownMarketMode(s.to_string())),
        }
    }
}
