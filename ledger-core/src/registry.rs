//! Closed set of registered currencies
//!
//! Currency support is extended by explicit registration, never by
//! accepting ad-hoc strings at operation time. Unknown codes are
//! rejected at the boundary with [`Error::InvalidCurrency`].

use crate::{types::CurrencyCode, Error, Result};
use std::collections::HashSet;

/// Registry of currency codes the ledger will accept
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    codes: HashSet<CurrencyCode>,
}

impl CurrencyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the standard corridor pair (INR, BDT)
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(CurrencyCode::INR);
        registry.register(CurrencyCode::BDT);
        registry
    }

    /// Register a currency code
    ///
    /// Returns `true` if the code was newly registered, `false` if it
    /// was already present. Registration is idempotent.
    pub fn register(&mut self, code: CurrencyCode) -> bool {
        let added = self.codes.insert(code);
        if added {
            tracing::info!(currency = %code, "Currency registered");
        }
        added
    }

    /// Whether a code has been registered
    pub fn is_registered(&self, code: CurrencyCode) -> bool {
        self.codes.contains(&code)
    }

    /// Fail with `InvalidCurrency` unless the code is registered
    pub fn ensure_registered(&self, code: CurrencyCode) -> Result<()> {
        if self.is_registered(code) {
            Ok(())
        } else {
            Err(Error::InvalidCurrency(format!(
                "{} is not a registered currency",
                code
            )))
        }
    }

    /// Number of registered currencies
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no currencies are registered
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over registered codes
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.codes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = CurrencyRegistry::standard();
        assert_eq!(registry.len(), 2);
        assert!(registry.is_registered(CurrencyCode::INR));
        assert!(registry.is_registered(CurrencyCode::BDT));
    }

    #[test]
    fn test_register_idempotent() {
        let mut registry = CurrencyRegistry::new();
        let usd = CurrencyCode::parse("USD").unwrap();
        assert!(registry.register(usd));
        assert!(!registry.register(usd));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregistered_code_rejected() {
        let registry = CurrencyRegistry::standard();
        let xyz = CurrencyCode::parse("XYZ").unwrap();
        let err = registry.ensure_registered(xyz).unwrap_err();
        assert!(matches!(err, Error::InvalidCurrency(_)));
    }
}
