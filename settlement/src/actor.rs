//! Single-writer ledger actor
//!
//! All mutating and reading operations funnel through one tokio task
//! that owns the ledger state outright. The mailbox serializes
//! operations, so every oracle read and balance mutation inside one
//! operation completes before the next operation begins.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use ledger_core::{AccountId, Amount, CurrencyCode, CurrencyRegistry, LedgerEvent};
use rates::PriceOracle;

use crate::{
    custody::NativeCustody,
    ops,
    state::LedgerState,
    transfer,
    types::{DepositReceipt, TransferOutcome, WithdrawReceipt},
    Error, Result,
};

tokio::task_local! {
    static IN_OPERATION: ();
}

/// True when the current task is already inside a ledger operation.
///
/// A custody implementation that calls back into the engine during
/// `release` would otherwise deadlock waiting on its own mailbox slot.
pub(crate) fn in_operation() -> bool {
    IN_OPERATION.try_with(|_| ()).is_ok()
}

pub(crate) enum EngineMessage {
    Deposit {
        account: AccountId,
        currency: CurrencyCode,
        native_amount: Amount,
        respond: oneshot::Sender<Result<DepositReceipt>>,
    },
    Withdraw {
        account: AccountId,
        currency: CurrencyCode,
        amount: Amount,
        respond: oneshot::Sender<Result<WithdrawReceipt>>,
    },
    Transfer {
        sender: AccountId,
        receiver: AccountId,
        amount: Amount,
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        respond: oneshot::Sender<Result<TransferOutcome>>,
    },
    GetBalance {
        account: AccountId,
        currency: CurrencyCode,
        respond: oneshot::Sender<Amount>,
    },
    RegisterCurrency {
        currency: CurrencyCode,
        respond: oneshot::Sender<bool>,
    },
    EventsFor {
        account: AccountId,
        respond: oneshot::Sender<Vec<LedgerEvent>>,
    },
    AllEvents {
        respond: oneshot::Sender<Vec<LedgerEvent>>,
    },
    Reconcile {
        respond: oneshot::Sender<Result<bool>>,
    },
    Shutdown,
}

pub(crate) struct EngineActor {
    state: LedgerState,
    oracle: Arc<dyn PriceOracle>,
    custody: Arc<dyn NativeCustody>,
    mailbox: mpsc::Receiver<EngineMessage>,
}

impl EngineActor {
    pub(crate) fn new(
        registry: CurrencyRegistry,
        oracle: Arc<dyn PriceOracle>,
        custody: Arc<dyn NativeCustody>,
        mailbox: mpsc::Receiver<EngineMessage>,
    ) -> Self {
        Self {
            state: LedgerState::new(registry),
            oracle,
            custody,
            mailbox,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::info!("Ledger actor started");
        while let Some(message) = self.mailbox.recv().await {
            if matches!(message, EngineMessage::Shutdown) {
                break;
            }
            IN_OPERATION.scope((), self.handle_message(message)).await;
        }
        tracing::info!("Ledger actor stopped");
    }

    async fn handle_message(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Deposit {
                account,
                currency,
                native_amount,
                respond,
            } => {
                let result = ops::deposit(
                    &mut self.state,
                    self.oracle.as_ref(),
                    &account,
                    currency,
                    native_amount,
                )
                .await;
                let _ = respond.send(result);
            }
            EngineMessage::Withdraw {
                account,
                currency,
                amount,
                respond,
            } => {
                let result = ops::withdraw(
                    &mut self.state,
                    self.oracle.as_ref(),
                    self.custody.as_ref(),
                    &account,
                    currency,
                    amount,
                )
                .await;
                let _ = respond.send(result);
            }
            EngineMessage::Transfer {
                sender,
                receiver,
                amount,
                from_currency,
                to_currency,
                respond,
            } => {
                let result = transfer::transfer(
                    &mut self.state,
                    self.oracle.as_ref(),
                    &sender,
                    &receiver,
                    amount,
                    from_currency,
                    to_currency,
                )
                .await;
                let _ = respond.send(result);
            }
            EngineMessage::GetBalance {
                account,
                currency,
                respond,
            } => {
                let _ = respond.send(self.state.balances.balance(&account, currency));
            }
            EngineMessage::RegisterCurrency { currency, respond } => {
                let _ = respond.send(self.state.registry.register(currency));
            }
            EngineMessage::EventsFor { account, respond } => {
                let _ = respond.send(self.state.journal.events_for(&account));
            }
            EngineMessage::AllEvents { respond } => {
                let _ = respond.send(self.state.journal.iter().cloned().collect());
            }
            EngineMessage::Reconcile { respond } => {
                let result = self
                    .state
                    .journal
                    .reconciles(&self.state.balances)
                    .map_err(Error::from);
                let _ = respond.send(result);
            }
            EngineMessage::Shutdown => unreachable!("handled by the run loop"),
        }
    }
}

/// Typed sender half of the actor mailbox.
#[derive(Clone)]
pub(crate) struct EngineHandle {
    sender: mpsc::Sender<EngineMessage>,
}

impl EngineHandle {
    fn closed(context: &str) -> Error {
        Error::Concurrency(format!("Ledger actor unavailable: {context}"))
    }

    async fn request<T>(
        &self,
        message: EngineMessage,
        receiver: oneshot::Receiver<T>,
    ) -> Result<T> {
        self.sender
            .send(message)
            .await
            .map_err(|_| Self::closed("mailbox closed"))?;
        receiver
            .await
            .map_err(|_| Self::closed("response channel dropped"))
    }

    pub(crate) async fn deposit(
        &self,
        account: AccountId,
        currency: CurrencyCode,
        native_amount: Amount,
    ) -> Result<DepositReceipt> {
        let (respond, rx) = oneshot::channel();
        self.request(
            EngineMessage::Deposit {
                account,
                currency,
                native_amount,
                respond,
            },
            rx,
        )
        .await?
    }

    pub(crate) async fn withdraw(
        &self,
        account: AccountId,
        currency: CurrencyCode,
        amount: Amount,
    ) -> Result<WithdrawReceipt> {
        let (respond, rx) = oneshot::channel();
        self.request(
            EngineMessage::Withdraw {
                account,
                currency,
                amount,
                respond,
            },
            rx,
        )
        .await?
    }

    pub(crate) async fn transfer(
        &self,
        sender: AccountId,
        receiver: AccountId,
        amount: Amount,
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
    ) -> Result<TransferOutcome> {
        let (respond, rx) = oneshot::channel();
        self.request(
            EngineMessage::Transfer {
                sender,
                receiver,
                amount,
                from_currency,
                to_currency,
                respond,
            },
            rx,
        )
        .await?
    }

    pub(crate) async fn balance(
        &self,
        account: AccountId,
        currency: CurrencyCode,
    ) -> Result<Amount> {
        let (respond, rx) = oneshot::channel();
        self.request(
            EngineMessage::GetBalance {
                account,
                currency,
                respond,
            },
            rx,
        )
        .await
    }

    pub(crate) async fn register_currency(&self, currency: CurrencyCode) -> Result<bool> {
        let (respond, rx) = oneshot::channel();
        self.request(EngineMessage::RegisterCurrency { currency, respond }, rx)
            .await
    }

    pub(crate) async fn events_for(&self, account: AccountId) -> Result<Vec<LedgerEvent>> {
        let (respond, rx) = oneshot::channel();
        self.request(EngineMessage::EventsFor { account, respond }, rx)
            .await
    }

    pub(crate) async fn all_events(&self) -> Result<Vec<LedgerEvent>> {
        let (respond, rx) = oneshot::channel();
        self.request(EngineMessage::AllEvents { respond }, rx).await
    }

    pub(crate) async fn reconcile(&self) -> Result<bool> {
        let (respond, rx) = oneshot::channel();
        self.request(EngineMessage::Reconcile { respond }, rx)
            .await?
    }

    pub(crate) async fn shutdown(&self) {
        let _ = self.sender.send(EngineMessage::Shutdown).await;
    }
}

pub(crate) fn spawn_engine_actor(
    registry: CurrencyRegistry,
    oracle: Arc<dyn PriceOracle>,
    custody: Arc<dyn NativeCustody>,
    mailbox_capacity: usize,
) -> EngineHandle {
    let (sender, receiver) = mpsc::channel(mailbox_capacity);
    let actor = EngineActor::new(registry, oracle, custody, receiver);
    tokio::spawn(actor.run());
    EngineHandle { sender }
}
