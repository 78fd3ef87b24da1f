use std::path::PathBuf;

use thiserror::Error;

/// Error type that captures common ledger failures.
///
/// None of these are fatal. A failed load leaves the ledger empty; a failed
/// export leaves the in-memory state as it was.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid kind `{0}`: expected `income` or `expense`")]
    InvalidKind(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Category must not be empty")]
    InvalidCategory,
    #[error("Index {index} is out of range for a ledger of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Load failed: {0}")]
    LoadFailed(String),
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
