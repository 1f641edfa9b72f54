//! State owned by the settlement actor

use ledger_core::{BalanceTable, CurrencyRegistry, Journal};

/// Ledger state behind the single mutation gate
///
/// Owned exclusively by the actor task; operations borrow it `&mut`,
/// which is what makes a check and its mutation one indivisible step.
pub(crate) struct LedgerState {
    pub(crate) registry: CurrencyRegistry,
    pub(crate) balances: BalanceTable,
    pub(crate) journal: Journal,
}

impl LedgerState {
    pub(crate) fn new(registry: CurrencyRegistry) -> Self {
        Self {
            registry,
            balances: BalanceTable::new(),
            journal: Journal::new(),
        }
    }
}
