//! BridgePay Ledger Core
//!
//! Authoritative per-account, per-currency balance store with an
//! append-only audit journal.
//!
//! # Architecture
//!
//! - **Single mutation gate**: the balance table is owned by exactly one
//!   writer; check and mutation are one step under `&mut self`
//! - **Closed currency set**: codes must be registered before any balance
//!   entry can use them
//! - **Integer money**: all amounts are `u128` in smallest indivisible
//!   units; conversions round down, never up
//! - **Append-only journal**: every applied mutation produces an
//!   immutable event, replayable for reconciliation

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod journal;
pub mod math;
pub mod registry;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use journal::Journal;
pub use registry::CurrencyRegistry;
pub use store::BalanceTable;
pub use types::{AccountId, Amount, CurrencyCode, EventKind, LedgerEvent, Price, PRICE_SCALE};
