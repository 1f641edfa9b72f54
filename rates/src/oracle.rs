//! The oracle interface consumed by the settlement layer

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use ledger_core::{CurrencyCode, Price};

use crate::{Error, Result};

/// Injected price dependency
///
/// `price(currency)` returns the current price of one native-asset unit
/// in `currency`, scaled by `PRICE_SCALE`. Implementations must not
/// cache across calls: each call is a live read.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current validated price for a currency
    async fn price(&self, currency: CurrencyCode) -> Result<Price>;
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Price(Price),
    Unavailable,
    Stale,
}

/// Deterministic oracle with fixed, settable prices
///
/// Drop-in [`PriceOracle`] for tests and pegged-rate demos. Each
/// currency can be pushed into outage or staleness to exercise
/// failure paths.
#[derive(Debug, Default)]
pub struct StaticOracle {
    entries: RwLock<HashMap<CurrencyCode, Entry>>,
}

impl StaticOracle {
    /// Oracle with no prices configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price for a currency
    pub fn set_price(&self, currency: CurrencyCode, price: Price) {
        self.entries.write().insert(currency, Entry::Price(price));
    }

    /// Make a currency's feed unreachable
    pub fn set_unavailable(&self, currency: CurrencyCode) {
        self.entries.write().insert(currency, Entry::Unavailable);
    }

    /// Flag a currency's feed as stale
    pub fn set_stale(&self, currency: CurrencyCode) {
        self.entries.write().insert(currency, Entry::Stale);
    }
}

#[async_trait]
impl PriceOracle for StaticOracle {
    async fn price(&self, currency: CurrencyCode) -> Result<Price> {
        let entry = self.entries.read().get(&currency).copied();
        match entry {
            Some(Entry::Price(0)) | Some(Entry::Stale) => Err(Error::InvalidPrice(format!(
                "fixture price for {} is unusable",
                currency
            ))),
            Some(Entry::Price(price)) => Ok(price),
            Some(Entry::Unavailable) | None => Err(Error::Unavailable(format!(
                "no price configured for {}",
                currency
            ))),
        }
    }
}
