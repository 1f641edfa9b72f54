//! Append-only audit journal
//!
//! Every applied balance mutation produces exactly one event here (two
//! for a transfer: debit leg + credit leg). Events are never mutated or
//! deleted, so replaying the journal must reproduce the balance table:
//! the reconciliation invariant the tests lean on.

use crate::{
    store::BalanceTable,
    types::{AccountId, Amount, CurrencyCode, EventKind, LedgerEvent},
    Error, Result,
};
use chrono::Utc;
use uuid::Uuid;

/// Append-only record of balance-affecting operations
#[derive(Debug, Default)]
pub struct Journal {
    events: Vec<LedgerEvent>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and append an event for an applied mutation
    ///
    /// Returns a clone of the appended event.
    pub fn record(
        &mut self,
        account: &AccountId,
        currency: CurrencyCode,
        delta: Amount,
        kind: EventKind,
        transfer_id: Option<Uuid>,
    ) -> LedgerEvent {
        let event = LedgerEvent {
            event_id: Uuid::now_v7(),
            account: account.clone(),
            currency,
            delta,
            kind,
            transfer_id,
            recorded_at: Utc::now(),
        };
        tracing::debug!(
            event_id = %event.event_id,
            account = %account,
            currency = %currency,
            delta,
            kind = ?kind,
            "Event recorded"
        );
        self.events.push(event.clone());
        event
    }

    /// All events, in append order
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    /// Events touching one account, in append order
    pub fn events_for(&self, account: &AccountId) -> Vec<LedgerEvent> {
        self.events
            .iter()
            .filter(|e| &e.account == account)
            .cloned()
            .collect()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the journal is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recompute a balance from event deltas
    ///
    /// Fails with `Arithmetic` if the journal does not describe a valid
    /// history (a debit exceeding prior credits), which can only happen
    /// if events were recorded for mutations that never applied.
    pub fn replayed_balance(
        &self,
        account: &AccountId,
        currency: CurrencyCode,
    ) -> Result<Amount> {
        let mut balance: Amount = 0;
        for event in self
            .events
            .iter()
            .filter(|e| &e.account == account && e.currency == currency)
        {
            balance = if event.kind.is_credit() {
                balance.checked_add(event.delta).ok_or_else(|| {
                    Error::Arithmetic("replayed balance overflows".to_string())
                })?
            } else {
                balance.checked_sub(event.delta).ok_or_else(|| {
                    Error::Arithmetic(
                        "journal replays to a negative balance".to_string(),
                    )
                })?
            };
        }
        Ok(balance)
    }

    /// Check that replaying the journal reproduces the balance table
    pub fn reconciles(&self, table: &BalanceTable) -> Result<bool> {
        let mut keys: Vec<(AccountId, CurrencyCode)> = self
            .events
            .iter()
            .map(|e| (e.account.clone(), e.currency))
            .collect();
        keys.sort_by(|a, b| (a.0.as_str(), a.1.as_str()).cmp(&(b.0.as_str(), b.1.as_str())));
        keys.dedup();

        for (account, currency) in keys {
            if self.replayed_balance(&account, currency)? != table.balance(&account, currency) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
