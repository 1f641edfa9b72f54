//! Error types for the oracle

use thiserror::Error;

/// Result type for oracle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Oracle errors
///
/// The split matters to callers: `Unavailable` means "try again",
/// `InvalidPrice` means the feed answered but the answer is unusable.
#[derive(Error, Debug)]
pub enum Error {
    /// The feed could not be reached (or timed out)
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    /// The feed answered with a non-positive or stale price
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}
