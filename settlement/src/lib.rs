//! BridgePay Settlement Engine
//!
//! Deposit/withdraw processing and atomic cross-border transfers over
//! the multi-currency ledger, converting value through a live price
//! oracle.
//!
//! # Architecture
//!
//! 1. **Validation**: amounts, currencies, and sender/receiver checks at
//!    the boundary
//! 2. **Rate read**: live oracle prices inside the serialized operation,
//!    never cached across operations
//! 3. **Mutation**: balance changes applied through the single-writer
//!    actor, so a transfer's debit+credit pair is indivisible
//! 4. **Audit**: one journal event per applied mutation (two per
//!    transfer), appended only on success
//!
//! All ledger-mutating operations run to completion (including their
//! oracle reads) before the next conflicting request begins: the actor
//! processes one message at a time over a bounded mailbox.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledger_core::{AccountId, CurrencyCode, PRICE_SCALE};
//! use rates::StaticOracle;
//! use settlement::{Config, NoopCustody, SettlementEngine};
//!
//! #[tokio::main]
//! async fn main() -> settlement::Result<()> {
//!     let oracle = Arc::new(StaticOracle::new());
//!     oracle.set_price(CurrencyCode::INR, 30_000 * PRICE_SCALE);
//!
//!     let engine =
//!         SettlementEngine::new(&Config::default(), oracle, Arc::new(NoopCustody))?;
//!
//!     let alice = AccountId::new("0xa11ce");
//!     let receipt = engine
//!         .deposit(alice.clone(), CurrencyCode::INR, PRICE_SCALE)
//!         .await?;
//!     assert_eq!(receipt.credited, 30_000 * PRICE_SCALE);
//!
//!     engine.shutdown().await;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod actor;
mod ops;
mod state;
mod transfer;

pub mod config;
pub mod custody;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod types;

// Re-exports
pub use config::Config;
pub use custody::{CustodyError, NativeCustody, NoopCustody};
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use types::{DepositReceipt, TransferOutcome, TransferPhase, WithdrawReceipt};
