//! Settlement engine facade
//!
//! Public async API over the single-writer ledger actor. Every call is
//! forwarded to the actor mailbox, so concurrent callers observe a
//! single total order of operations.

use std::sync::Arc;

use ledger_core::{AccountId, Amount, CurrencyCode, CurrencyRegistry, LedgerEvent, Price};
use rates::PriceOracle;

use crate::{
    actor::{self, EngineHandle},
    config::Config,
    custody::NativeCustody,
    metrics::Metrics,
    types::{DepositReceipt, TransferOutcome, WithdrawReceipt},
    Error, Result,
};

/// Multi-currency settlement engine over a native-asset reserve.
#[derive(Clone)]
pub struct SettlementEngine {
    handle: EngineHandle,
    oracle: Arc<dyn PriceOracle>,
    metrics: Metrics,
}

impl SettlementEngine {
    /// Spawn the ledger actor and return a handle to it.
    ///
    /// Registers every currency named in `config.currencies`; a
    /// malformed code fails construction.
    pub fn new(
        config: &Config,
        oracle: Arc<dyn PriceOracle>,
        custody: Arc<dyn NativeCustody>,
    ) -> Result<Self> {
        let mut registry = CurrencyRegistry::new();
        for raw in &config.currencies {
            registry.register(CurrencyCode::parse(raw)?);
        }
        let metrics = Metrics::new()?;
        let handle = actor::spawn_engine_actor(
            registry,
            Arc::clone(&oracle),
            custody,
            config.mailbox_capacity,
        );
        tracing::info!(
            service = %config.service_name,
            version = %config.service_version,
            currencies = config.currencies.len(),
            "Settlement engine started"
        );
        Ok(Self {
            handle,
            oracle,
            metrics,
        })
    }

    fn guard(&self) -> Result<()> {
        if actor::in_operation() {
            return Err(Error::ReentrancyDetected);
        }
        Ok(())
    }

    fn observe<T>(&self, counter: &prometheus::IntCounter, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                counter.inc();
                Ok(value)
            }
            Err(err) => {
                self.metrics.failures_total.inc();
                Err(err)
            }
        }
    }

    /// Convert `native_amount` reserve units into `currency` at the
    /// current oracle price and credit the account.
    pub async fn deposit(
        &self,
        account: AccountId,
        currency: CurrencyCode,
        native_amount: Amount,
    ) -> Result<DepositReceipt> {
        self.guard()?;
        let timer = self.metrics.op_duration.start_timer();
        let result = self.handle.deposit(account, currency, native_amount).await;
        timer.observe_duration();
        self.observe(&self.metrics.deposits_total, result)
    }

    /// Debit `amount` of `currency` and release the native equivalent
    /// from custody.
    pub async fn withdraw(
        &self,
        account: AccountId,
        currency: CurrencyCode,
        amount: Amount,
    ) -> Result<WithdrawReceipt> {
        self.guard()?;
        let timer = self.metrics.op_duration.start_timer();
        let result = self.handle.withdraw(account, currency, amount).await;
        timer.observe_duration();
        self.observe(&self.metrics.withdrawals_total, result)
    }

    /// Move value between accounts across currencies through the
    /// native asset, atomically.
    pub async fn transfer(
        &self,
        sender: AccountId,
        receiver: AccountId,
        amount: Amount,
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
    ) -> Result<TransferOutcome> {
        self.guard()?;
        let timer = self.metrics.op_duration.start_timer();
        let result = self
            .handle
            .transfer(sender, receiver, amount, from_currency, to_currency)
            .await;
        timer.observe_duration();
        self.observe(&self.metrics.transfers_total, result)
    }

    /// Current balance; zero for accounts never credited.
    pub async fn balance(&self, account: AccountId, currency: CurrencyCode) -> Result<Amount> {
        self.guard()?;
        self.handle.balance(account, currency).await
    }

    /// Add a currency to the registry. Returns false if it was
    /// already registered.
    pub async fn register_currency(&self, currency: CurrencyCode) -> Result<bool> {
        self.guard()?;
        self.handle.register_currency(currency).await
    }

    /// Audit events touching one account, in settlement order.
    pub async fn events_for(&self, account: AccountId) -> Result<Vec<LedgerEvent>> {
        self.guard()?;
        self.handle.events_for(account).await
    }

    /// The full audit log, in settlement order.
    pub async fn all_events(&self) -> Result<Vec<LedgerEvent>> {
        self.guard()?;
        self.handle.all_events().await
    }

    /// True when replaying the audit log reproduces every balance.
    pub async fn reconciled(&self) -> Result<bool> {
        self.guard()?;
        self.handle.reconcile().await
    }

    /// Current oracle price for `currency`, without touching the ledger.
    pub async fn price(&self, currency: CurrencyCode) -> Result<Price> {
        Ok(self.oracle.price(currency).await?)
    }

    /// Engine metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Stop the ledger actor. In-flight operations complete first.
    pub async fn shutdown(&self) {
        self.handle.shutdown().await;
    }
}
