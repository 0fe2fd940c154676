use thiserror::Error;

use common::error::Error as MarketError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed rate matrix: {0}")]
    MalformedMatrix(String),

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Analysis task failed: {0}")]
    TaskFailed(String),
}
