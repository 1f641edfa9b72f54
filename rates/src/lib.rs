//! BridgePay Price Oracle
//!
//! Wraps one external price feed per supported currency and exposes a
//! single validated read: the current price of the native settlement
//! asset in that currency, scaled by `PRICE_SCALE`.
//!
//! # Guarantees
//!
//! - **Pure read**: no retries, no caching; every call hits the feed, so
//!   a multi-step operation never settles against a stale rate
//! - **Validated**: non-positive and stale quotes are rejected before
//!   they reach any balance arithmetic
//! - **Injectable**: consumers depend on the [`PriceOracle`] trait and
//!   can substitute [`StaticOracle`] as a deterministic fixture

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod adapter;
pub mod error;
pub mod feed;
pub mod oracle;

// Re-exports
pub use adapter::OracleAdapter;
pub use error::{Error, Result};
pub use feed::{FeedError, FeedQuote, PriceFeed, StaticFeed};
pub use oracle::{PriceOracle, StaticOracle};
