use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Rejected transaction fields, raised at construction or deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be zero or greater, got {0}")]
    NegativeAmount(Decimal),
    #[error("amount `{0}` is not a number")]
    InvalidAmount(String),
    #[error("transaction type must be income or expense, got `{0}`")]
    UnknownTransactionType(String),
    #[error("category cannot be empty")]
    EmptyCategory,
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("date `{0}` is not in a recognized format")]
    InvalidDate(String),
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("window end must not be before start")]
    InvalidWindow,
}

/// A persisted row that could not be turned into a transaction. Skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line in the backing file, header included.
    pub line: u64,
    pub reason: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}
