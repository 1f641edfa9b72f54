//! Error types for the settlement engine
//!
//! Every failure aborts the enclosing operation and leaves ledger state
//! unchanged. Callers always receive the specific kind, so a client can
//! distinguish "try again" (oracle) from "request is invalid" (amount,
//! currency) from "not enough funds".

use thiserror::Error;

use crate::custody::CustodyError;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (invalid amount/currency, insufficient balance, arithmetic)
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::Error),

    /// Oracle error (unavailable or invalid price)
    #[error("Oracle error: {0}")]
    Oracle(#[from] rates::Error),

    /// Sender and receiver are the same account
    #[error("Transfer rejected: sender and receiver are the same account")]
    SelfTransfer,

    /// Call re-entered the engine from inside an in-flight operation
    #[error("Reentrant call rejected")]
    ReentrancyDetected,

    /// Native-asset release failed; the debit was rolled back
    #[error("Custody error: {0}")]
    Custody(String),

    /// Actor mailbox or response channel closed
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<CustodyError> for Error {
    fn from(err: CustodyError) -> Self {
        Error::Custody(err.to_string())
    }
}
