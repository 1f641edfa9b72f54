//! Receipts returned by settlement operations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_core::{Amount, Price};

/// Result of a successful deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Ledger units credited (native amount converted at `price`)
    pub credited: Amount,

    /// Live price the conversion used
    pub price: Price,

    /// Journal event recording the credit
    pub event_id: Uuid,
}

/// Result of a successful withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Native-asset units released after the debit committed
    pub native_released: Amount,

    /// Live price the conversion used
    pub price: Price,

    /// Journal event recording the debit
    pub event_id: Uuid,
}

/// Result of a successful cross-border transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Links the debit and credit journal events
    pub transfer_id: Uuid,

    /// Intermediate native-asset value of the debited amount
    pub native_equivalent: Amount,

    /// Destination-currency units credited to the receiver
    pub credited: Amount,

    /// Source currency price at execution
    pub price_from: Price,

    /// Destination currency price at execution
    pub price_to: Price,

    /// Journal event for the sender's debit leg
    pub debit_event_id: Uuid,

    /// Journal event for the receiver's credit leg
    pub credit_event_id: Uuid,
}

/// Lifecycle of one transfer attempt
///
/// `Validated → RatesLocked → Debited → Credited` on success; any
/// failure moves to `Reverted`, which undoes every mutation the attempt
/// applied. There is no observable state between `Debited` and the
/// terminal phases: the pair commits or rolls back within one
/// serialized operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferPhase {
    /// Inputs checked (distinct accounts, positive amount, registered codes)
    Validated,
    /// Both prices read fresh at the same logical instant
    RatesLocked,
    /// Sender debited
    Debited,
    /// Receiver credited (terminal success)
    Credited,
    /// All mutations undone (terminal failure)
    Reverted,
}
