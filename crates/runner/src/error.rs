//! Runner errors

use std::path::PathBuf;

use closing_core::{BookError, BookKey, Lag};
use closing_liquidity::RemovalError;
use closing_ports::AuctionError;
use thiserror::Error;

/// Failures reading snapshot or close-price files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Column '{0}' maps to a volume slot already taken")]
    DuplicateColumn(String),

    #[error("Line {line}: invalid {field} '{value}'")]
    InvalidValue {
        line: u64,
        field: String,
        value: String,
    },

    #[error("Line {line}: duplicate price level {key} @ {price}")]
    DuplicateRow {
        line: u64,
        key: BookKey,
        price: String,
    },

    #[error("Line {line}: duplicate closing price for {key}")]
    DuplicateClose { line: u64, key: BookKey },

    #[error("Invalid book {key}: {source}")]
    Book {
        key: BookKey,
        #[source]
        source: BookError,
    },
}

/// Invalid analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures of a single (date, symbol) unit of work
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error(transparent)]
    Book(#[from] BookError),

    #[error(transparent)]
    Auction(#[from] AuctionError),

    #[error(transparent)]
    Removal(#[from] RemovalError),

    #[error("Reference lag {0} not recorded")]
    MissingLag(Lag),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{key}: {source}")]
    Unit {
        key: BookKey,
        #[source]
        source: UnitError,
    },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
