//! Deposit and withdrawal processors
//!
//! Both convert between native-asset value and ledger currency at the
//! live oracle price, rounding down on every conversion. Withdrawals
//! follow checks-effects-interactions: the debit commits before any
//! native asset moves, and a failed release rolls the debit back.

use ledger_core::{math, AccountId, Amount, CurrencyCode, EventKind, PRICE_SCALE};
use rates::PriceOracle;

use crate::{
    custody::NativeCustody,
    state::LedgerState,
    types::{DepositReceipt, WithdrawReceipt},
    Result,
};

pub(crate) async fn deposit(
    state: &mut LedgerState,
    oracle: &dyn PriceOracle,
    account: &AccountId,
    currency: CurrencyCode,
    native_amount: Amount,
) -> Result<DepositReceipt> {
    if native_amount == 0 {
        return Err(ledger_core::Error::InvalidAmount(
            "deposit requires a positive native-asset amount".to_string(),
        )
        .into());
    }
    state.registry.ensure_registered(currency)?;

    let price = oracle.price(currency).await?;
    let credited = math::mul_div_floor(native_amount, price, PRICE_SCALE)?;
    if credited == 0 {
        return Err(ledger_core::Error::InvalidAmount(format!(
            "{} native units convert to zero {} units",
            native_amount, currency
        ))
        .into());
    }

    state.balances.credit(account, currency, credited)?;
    let event = state
        .journal
        .record(account, currency, credited, EventKind::Deposit, None);

    tracing::info!(
        account = %account,
        currency = %currency,
        native_amount,
        credited,
        price,
        "Deposit settled"
    );

    Ok(DepositReceipt {
        credited,
        price,
        event_id: event.event_id,
    })
}

pub(crate) async fn withdraw(
    state: &mut LedgerState,
    oracle: &dyn PriceOracle,
    custody: &dyn NativeCustody,
    account: &AccountId,
    currency: CurrencyCode,
    amount: Amount,
) -> Result<WithdrawReceipt> {
    if amount == 0 {
        return Err(ledger_core::Error::InvalidAmount(
            "withdrawal requires a positive amount".to_string(),
        )
        .into());
    }
    state.registry.ensure_registered(currency)?;

    let price = oracle.price(currency).await?;
    let native_amount = math::mul_div_floor(amount, PRICE_SCALE, price)?;
    if native_amount == 0 {
        return Err(ledger_core::Error::InvalidAmount(format!(
            "{} {} converts to zero native units",
            amount, currency
        ))
        .into());
    }

    // State mutation precedes the external transfer
    state.balances.debit(account, currency, amount)?;

    if let Err(err) = custody.release(account, native_amount).await {
        state.balances.restore(account, currency, amount);
        tracing::warn!(
            account = %account,
            currency = %currency,
            amount,
            error = %err,
            "Native release failed, debit rolled back"
        );
        return Err(err.into());
    }

    let event = state
        .journal
        .record(account, currency, amount, EventKind::Withdraw, None);

    tracing::info!(
        account = %account,
        currency = %currency,
        amount,
        native_amount,
        price,
        "Withdrawal settled"
    );

    Ok(WithdrawReceipt {
        native_released: native_amount,
        price,
        event_id: event.event_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::{CustodyError, NoopCustody};
    use crate::Error;
    use async_trait::async_trait;
    use ledger_core::CurrencyRegistry;
    use rates::StaticOracle;

    struct FailingCustody;

    #[async_trait]
    impl NativeCustody for FailingCustody {
        async fn release(
            &self,
            _account: &AccountId,
            _native_amount: Amount,
        ) -> std::result::Result<(), CustodyError> {
            Err(CustodyError::Release("rail down".to_string()))
        }
    }

    fn state() -> LedgerState {
        LedgerState::new(CurrencyRegistry::standard())
    }

    fn oracle() -> StaticOracle {
        let oracle = StaticOracle::new();
        oracle.set_price(CurrencyCode::INR, PRICE_SCALE); // 1:1
        oracle
    }

    fn alice() -> AccountId {
        AccountId::new("0xa11ce")
    }

    #[tokio::test]
    async fn test_deposit_credits_at_live_price() {
        let mut state = state();
        let oracle = oracle();
        oracle.set_price(CurrencyCode::INR, 30_000 * PRICE_SCALE);

        let receipt = deposit(&mut state, &oracle, &alice(), CurrencyCode::INR, PRICE_SCALE)
            .await
            .unwrap();

        assert_eq!(receipt.credited, 30_000 * PRICE_SCALE);
        assert_eq!(
            state.balances.balance(&alice(), CurrencyCode::INR),
            30_000 * PRICE_SCALE
        );
        assert_eq!(state.journal.len(), 1);
    }

    #[tokio::test]
    async fn test_deposit_zero_native_rejected() {
        let mut state = state();
        let err = deposit(&mut state, &oracle(), &alice(), CurrencyCode::INR, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_deposit_flooring_to_zero_rejected() {
        let mut state = state();
        let oracle = StaticOracle::new();
        oracle.set_price(CurrencyCode::INR, 1); // 1 native unit -> 1/1e8 INR units

        let err = deposit(&mut state, &oracle, &alice(), CurrencyCode::INR, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InvalidAmount(_))
        ));
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 0);
        assert!(state.journal.is_empty());
    }

    #[tokio::test]
    async fn test_deposit_unregistered_currency_rejected() {
        let mut state = state();
        let xyz = CurrencyCode::parse("XYZ").unwrap();
        let err = deposit(&mut state, &oracle(), &alice(), xyz, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InvalidCurrency(_))
        ));
    }

    #[tokio::test]
    async fn test_withdraw_debits_before_release() {
        let mut state = state();
        let oracle = oracle();
        deposit(&mut state, &oracle, &alice(), CurrencyCode::INR, 500)
            .await
            .unwrap();

        let receipt = withdraw(
            &mut state,
            &oracle,
            &NoopCustody,
            &alice(),
            CurrencyCode::INR,
            200,
        )
        .await
        .unwrap();

        assert_eq!(receipt.native_released, 200);
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 300);
        assert_eq!(state.journal.len(), 2);
    }

    #[tokio::test]
    async fn test_withdraw_insufficient_leaves_state_unchanged() {
        let mut state = state();
        let oracle = oracle();
        deposit(&mut state, &oracle, &alice(), CurrencyCode::INR, 500)
            .await
            .unwrap();

        let err = withdraw(
            &mut state,
            &oracle,
            &NoopCustody,
            &alice(),
            CurrencyCode::INR,
            1000,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InsufficientBalance {
                available: 500,
                requested: 1000
            })
        ));
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 500);
        assert_eq!(state.journal.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_release_rolls_debit_back() {
        let mut state = state();
        let oracle = oracle();
        deposit(&mut state, &oracle, &alice(), CurrencyCode::INR, 500)
            .await
            .unwrap();

        let err = withdraw(
            &mut state,
            &oracle,
            &FailingCustody,
            &alice(),
            CurrencyCode::INR,
            200,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Custody(_)));
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 500);
        // no Withdraw event for a reverted attempt
        assert_eq!(state.journal.len(), 1);
    }
}
