//! Native-asset custody seam
//!
//! Withdrawals end with native asset leaving the reserve. The transport
//! for that movement is an external collaborator behind this trait; the
//! engine only guarantees ordering (ledger debit commits first) and
//! rollback (a failed release restores the debit).

use async_trait::async_trait;
use thiserror::Error;

use ledger_core::{AccountId, Amount};

/// Failure of the external native-asset transfer
#[derive(Error, Debug)]
pub enum CustodyError {
    /// The release could not be completed
    #[error("release failed: {0}")]
    Release(String),
}

/// External reserve that pays out native asset
#[async_trait]
pub trait NativeCustody: Send + Sync {
    /// Release native-asset units to an account's address
    ///
    /// Called only after the corresponding ledger debit has committed.
    async fn release(
        &self,
        account: &AccountId,
        native_amount: Amount,
    ) -> std::result::Result<(), CustodyError>;
}

/// Custody that only logs the release
///
/// For demos and deployments where the native leg settles out of band.
#[derive(Debug, Default)]
pub struct NoopCustody;

#[async_trait]
impl NativeCustody for NoopCustody {
    async fn release(
        &self,
        account: &AccountId,
        native_amount: Amount,
    ) -> std::result::Result<(), CustodyError> {
        tracing::info!(
            account = %account,
            native_amount,
            "Native asset release recorded (noop custody)"
        );
        Ok(())
    }
}
