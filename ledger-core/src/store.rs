//! Balance table
//!
//! The authoritative per-account, per-currency balance store. All
//! mutations pass through here. The table is owned by a single writer
//! (`&mut self` is the mutation gate), so a check and its mutation are
//! one indivisible step: no other operation can observe an intermediate
//! state.

use crate::{
    types::{AccountId, Amount, CurrencyCode},
    Error, Result,
};
use std::collections::HashMap;

/// Per-account, per-currency balance store
#[derive(Debug, Default)]
pub struct BalanceTable {
    balances: HashMap<(AccountId, CurrencyCode), Amount>,
}

impl BalanceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance, 0 for unknown (account, currency) pairs
    pub fn balance(&self, account: &AccountId, currency: CurrencyCode) -> Amount {
        self.balances
            .get(&(account.clone(), currency))
            .copied()
            .unwrap_or(0)
    }

    /// Increase a balance, creating the entry on first use
    ///
    /// Returns the new balance. Fails with `InvalidAmount` for zero
    /// amounts and `Arithmetic` if the balance would overflow.
    pub fn credit(
        &mut self,
        account: &AccountId,
        currency: CurrencyCode,
        amount: Amount,
    ) -> Result<Amount> {
        ensure_positive(amount)?;
        let entry = self.balances.entry((account.clone(), currency)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or_else(|| {
            Error::Arithmetic(format!(
                "credit of {} to {}/{} overflows balance",
                amount, account, currency
            ))
        })?;
        tracing::debug!(
            account = %account,
            currency = %currency,
            amount,
            balance = *entry,
            "Balance credited"
        );
        Ok(*entry)
    }

    /// Decrease a balance
    ///
    /// Returns the new balance. Fails with `InsufficientBalance` if the
    /// amount exceeds the current balance; the check and the mutation are
    /// a single step, so the balance is never transiently negative.
    pub fn debit(
        &mut self,
        account: &AccountId,
        currency: CurrencyCode,
        amount: Amount,
    ) -> Result<Amount> {
        ensure_positive(amount)?;
        let available = self.balance(account, currency);
        if amount > available {
            return Err(Error::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        let entry = self
            .balances
            .entry((account.clone(), currency))
            .or_insert(0);
        *entry -= amount;
        tracing::debug!(
            account = %account,
            currency = %currency,
            amount,
            balance = *entry,
            "Balance debited"
        );
        Ok(*entry)
    }

    /// Re-credit an amount debited earlier in the same operation
    ///
    /// Used only to roll back a just-applied debit, which makes the add
    /// infallible: the balance returns to a value it already held.
    pub fn restore(&mut self, account: &AccountId, currency: CurrencyCode, amount: Amount) {
        let entry = self.balances.entry((account.clone(), currency)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .expect("restore cannot overflow: amount was just debited");
        tracing::debug!(
            account = %account,
            currency = %currency,
            amount,
            balance = *entry,
            "Debit rolled back"
        );
    }

    /// Number of (account, currency) entries ever touched
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

fn ensure_positive(amount: Amount) -> Result<()> {
    if amount == 0 {
        return Err(Error::InvalidAmount(
            "amount must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
