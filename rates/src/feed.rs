//! Raw price feed abstraction
//!
//! The transport behind a feed (on-chain aggregator, HTTP poller, ...)
//! is an external collaborator; this module only fixes the shape a feed
//! must answer with. [`StaticFeed`] is the in-process implementation
//! used by tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ledger_core::Price;

/// Failure of the raw transport
#[derive(Error, Debug)]
pub enum FeedError {
    /// The feed endpoint could not be reached
    #[error("feed unreachable: {0}")]
    Unreachable(String),
}

/// A single answer from a raw feed, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedQuote {
    /// Native-asset price in the feed's currency, scaled by `PRICE_SCALE`
    pub price: Price,

    /// Whether the feed itself flags the round as stale
    pub stale: bool,

    /// When the feed produced this quote
    pub as_of: DateTime<Utc>,
}

/// One external price feed for a single currency pair
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Latest quote from the feed
    async fn latest(&self) -> std::result::Result<FeedQuote, FeedError>;
}

/// In-process feed with a settable quote
#[derive(Debug, Default)]
pub struct StaticFeed {
    quote: RwLock<Option<FeedQuote>>,
}

impl StaticFeed {
    /// Feed answering with the given price, quoted now
    pub fn with_price(price: Price) -> Self {
        let feed = Self::default();
        feed.set_price(price);
        feed
    }

    /// Feed that fails every request
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Replace the quote with a fresh one at the given price
    pub fn set_price(&self, price: Price) {
        *self.quote.write() = Some(FeedQuote {
            price,
            stale: false,
            as_of: Utc::now(),
        });
    }

    /// Replace the quote wholesale (stale flags, old timestamps, ...)
    pub fn set_quote(&self, quote: FeedQuote) {
        *self.quote.write() = Some(quote);
    }

    /// Make subsequent requests fail
    pub fn go_dark(&self) {
        *self.quote.write() = None;
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn latest(&self) -> std::result::Result<FeedQuote, FeedError> {
        self.quote
            .read()
            .clone()
            .ok_or_else(|| FeedError::Unreachable("static feed has no quote".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_feed_answers() {
        let feed = StaticFeed::with_price(30_000 * ledger_core::PRICE_SCALE);
        let quote = feed.latest().await.unwrap();
        assert_eq!(quote.price, 30_000 * ledger_core::PRICE_SCALE);
        assert!(!quote.stale);
    }

    #[tokio::test]
    async fn test_static_feed_goes_dark() {
        let feed = StaticFeed::with_price(1);
        feed.go_dark();
        assert!(matches!(
            feed.latest().await,
            Err(FeedError::Unreachable(_))
        ));
    }
}
