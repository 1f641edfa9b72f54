//! Oracle adapter over raw feeds
//!
//! Routes each currency to its registered feed, bounds the feed call
//! with a timeout, and validates the answer before anyone converts
//! value with it. No retries happen here: whether to retry or abort is
//! the caller's decision.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

use ledger_core::{CurrencyCode, Price};

use crate::{
    feed::{FeedQuote, PriceFeed},
    oracle::PriceOracle,
    Error, Result,
};

/// Default bound on a single feed call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default maximum quote age before it counts as stale
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

/// Wraps one external feed per supported currency
pub struct OracleAdapter {
    feeds: HashMap<CurrencyCode, Arc<dyn PriceFeed>>,
    timeout: Duration,
    max_age: Duration,
}

impl OracleAdapter {
    /// Adapter with default timeout and staleness bound
    pub fn new() -> Self {
        Self {
            feeds: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the maximum accepted quote age
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Register the feed for a currency
    pub fn with_feed(mut self, currency: CurrencyCode, feed: Arc<dyn PriceFeed>) -> Self {
        self.feeds.insert(currency, feed);
        self
    }

    fn validate(&self, currency: CurrencyCode, quote: FeedQuote) -> Result<Price> {
        if quote.price == 0 {
            return Err(Error::InvalidPrice(format!(
                "feed for {} answered a non-positive price",
                currency
            )));
        }
        if quote.stale {
            return Err(Error::InvalidPrice(format!(
                "feed for {} flagged its round stale",
                currency
            )));
        }
        let age = Utc::now().signed_duration_since(quote.as_of);
        if age.num_seconds() > self.max_age.as_secs() as i64 {
            return Err(Error::InvalidPrice(format!(
                "quote for {} is {}s old, max {}s",
                currency,
                age.num_seconds(),
                self.max_age.as_secs()
            )));
        }
        Ok(quote.price)
    }
}

impl Default for OracleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceOracle for OracleAdapter {
    async fn price(&self, currency: CurrencyCode) -> Result<Price> {
        let feed = self.feeds.get(&currency).ok_or_else(|| {
            Error::Unavailable(format!("no feed registered for {}", currency))
        })?;

        let quote = timeout(self.timeout, feed.latest())
            .await
            .map_err(|_| {
                tracing::warn!(currency = %currency, "Feed call timed out");
                Error::Unavailable(format!(
                    "feed for {} timed out after {:?}",
                    currency, self.timeout
                ))
            })?
            .map_err(|e| {
                tracing::warn!(currency = %currency, error = %e, "Feed unreachable");
                Error::Unavailable(e.to_string())
            })?;

        let price = self.validate(currency, quote)?;
        tracing::debug!(currency = %currency, price, "Price read");
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedError, StaticFeed};
    use ledger_core::PRICE_SCALE;

    /// Feed that never answers, for exercising the timeout path
    struct SilentFeed;

    #[async_trait]
    impl PriceFeed for SilentFeed {
        async fn latest(&self) -> std::result::Result<FeedQuote, FeedError> {
            std::future::pending().await
        }
    }

    fn adapter_with(currency: CurrencyCode, feed: Arc<dyn PriceFeed>) -> OracleAdapter {
        OracleAdapter::new()
            .with_timeout(Duration::from_millis(50))
            .with_feed(currency, feed)
    }

    #[tokio::test]
    async fn test_valid_quote_passes() {
        let feed = Arc::new(StaticFeed::with_price(30_000 * PRICE_SCALE));
        let adapter = adapter_with(CurrencyCode::INR, feed);
        assert_eq!(
            adapter.price(CurrencyCode::INR).await.unwrap(),
            30_000 * PRICE_SCALE
        );
    }

    #[tokio::test]
    async fn test_missing_feed_is_unavailable() {
        let adapter = OracleAdapter::new();
        assert!(matches!(
            adapter.price(CurrencyCode::BDT).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_unavailable() {
        let feed = Arc::new(StaticFeed::unreachable());
        let adapter = adapter_with(CurrencyCode::INR, feed);
        assert!(matches!(
            adapter.price(CurrencyCode::INR).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let adapter = adapter_with(CurrencyCode::INR, Arc::new(SilentFeed));
        assert!(matches!(
            adapter.price(CurrencyCode::INR).await,
            Err(Error::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_price_rejected() {
        let feed = Arc::new(StaticFeed::with_price(0));
        let adapter = adapter_with(CurrencyCode::INR, feed);
        assert!(matches!(
            adapter.price(CurrencyCode::INR).await,
            Err(Error::InvalidPrice(_))
        ));
    }

    #[tokio::test]
    async fn test_stale_flag_rejected() {
        let feed = Arc::new(StaticFeed::default());
        feed.set_quote(FeedQuote {
            price: 100 * PRICE_SCALE,
            stale: true,
            as_of: Utc::now(),
        });
        let adapter = adapter_with(CurrencyCode::INR, feed);
        assert!(matches!(
            adapter.price(CurrencyCode::INR).await,
            Err(Error::InvalidPrice(_))
        ));
    }

    #[tokio::test]
    async fn test_old_quote_rejected() {
        let feed = Arc::new(StaticFeed::default());
        feed.set_quote(FeedQuote {
            price: 100 * PRICE_SCALE,
            stale: false,
            as_of: Utc::now() - chrono::Duration::seconds(3600),
        });
        let adapter = adapter_with(CurrencyCode::INR, feed);
        assert!(matches!(
            adapter.price(CurrencyCode::INR).await,
            Err(Error::InvalidPrice(_))
        ));
    }
}
