//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Amount is zero or otherwise malformed
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Currency code is not registered
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Debit exceeds the current balance
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Balance available at the time of the debit
        available: u128,
        /// Amount the debit asked for
        requested: u128,
    },

    /// Checked arithmetic failed (overflow or zero divisor)
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),
}
