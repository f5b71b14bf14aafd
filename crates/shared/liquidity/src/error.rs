use closing_core::BookError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemovalError {
    #[error("Percent must lie within [0, 1]: {0}")]
    InvalidPercent(Decimal),

    #[error(
        "Unknown removal policy '{0}' (expected SeparatePassive, SeparateOrders, FullPassive, FullLiquidity or CrossedVolume)"
    )]
    UnknownPolicy(String),

    #[error("Unknown market mode '{0}' (expected none, all or cont)")]
    UnknownMarketMode(String),

    #[error("Book error: {0}")]
    Book(#[from] BookError),
}

pub type Result<T> = std::result::Result<T, RemovalError>;
