//! Error types for the Ising scan.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsingError {
    /// Run parameters that can never produce a valid simulation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Physical quantity outside its domain (e.g. T <= 0, where β is undefined).
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl From<std::io::Error> for IsingError {
    fn from(err: std::io::Error) -> Self {
        IsingError::Report(err.to_string())
    }
}

impl From<csv::Error> for IsingError {
    fn from(err: csv::Error) -> Self {
        IsingError::Report(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IsingError>;
