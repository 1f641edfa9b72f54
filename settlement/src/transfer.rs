//! Cross-border transfer engine
//!
//! Converts value source-currency → native-asset → destination-currency
//! at two fresh oracle prices and applies the debit/credit pair as one
//! atomic unit. Both conversions round down; the bounded sliver lost to
//! double truncation stays in the reserve and never favors the
//! initiator.

use uuid::Uuid;

use ledger_core::{math, AccountId, Amount, CurrencyCode, EventKind, PRICE_SCALE};
use rates::PriceOracle;

use crate::{
    state::LedgerState,
    types::{TransferOutcome, TransferPhase},
    Error, Result,
};

pub(crate) async fn transfer(
    state: &mut LedgerState,
    oracle: &dyn PriceOracle,
    sender: &AccountId,
    receiver: &AccountId,
    amount: Amount,
    from_currency: CurrencyCode,
    to_currency: CurrencyCode,
) -> Result<TransferOutcome> {
    if sender == receiver {
        return Err(Error::SelfTransfer);
    }
    if amount == 0 {
        return Err(ledger_core::Error::InvalidAmount(
            "transfer requires a positive amount".to_string(),
        )
        .into());
    }
    state.registry.ensure_registered(from_currency)?;
    state.registry.ensure_registered(to_currency)?;

    let transfer_id = Uuid::now_v7();
    let mut phase = TransferPhase::Validated;
    tracing::debug!(transfer_id = %transfer_id, phase = ?phase, "Transfer validated");

    // Both prices fresh at the same logical instant: read back to back
    // inside this serialized operation, never cached across operations.
    let price_from = oracle.price(from_currency).await?;
    let price_to = oracle.price(to_currency).await?;
    phase = TransferPhase::RatesLocked;
    tracing::debug!(
        transfer_id = %transfer_id,
        phase = ?phase,
        price_from,
        price_to,
        "Rates locked"
    );

    let native_equivalent = math::mul_div_floor(amount, PRICE_SCALE, price_from)?;
    let credited = math::mul_div_floor(native_equivalent, price_to, PRICE_SCALE)?;
    if credited == 0 {
        return Err(ledger_core::Error::InvalidAmount(format!(
            "{} {} converts to zero {} units",
            amount, from_currency, to_currency
        ))
        .into());
    }

    // A failed debit aborts with no state change.
    state.balances.debit(sender, from_currency, amount)?;
    phase = TransferPhase::Debited;
    tracing::debug!(transfer_id = %transfer_id, phase = ?phase, amount, "Sender debited");

    if let Err(err) = state.balances.credit(receiver, to_currency, credited) {
        state.balances.restore(sender, from_currency, amount);
        phase = TransferPhase::Reverted;
        tracing::warn!(
            transfer_id = %transfer_id,
            phase = ?phase,
            error = %err,
            "Credit failed, debit rolled back"
        );
        return Err(err.into());
    }
    phase = TransferPhase::Credited;

    let debit_event = state.journal.record(
        sender,
        from_currency,
        amount,
        EventKind::TransferOut,
        Some(transfer_id),
    );
    let credit_event = state.journal.record(
        receiver,
        to_currency,
        credited,
        EventKind::TransferIn,
        Some(transfer_id),
    );

    tracing::info!(
        transfer_id = %transfer_id,
        phase = ?phase,
        sender = %sender,
        receiver = %receiver,
        amount,
        from_currency = %from_currency,
        credited,
        to_currency = %to_currency,
        native_equivalent,
        "Transfer settled"
    );

    Ok(TransferOutcome {
        transfer_id,
        native_equivalent,
        credited,
        price_from,
        price_to,
        debit_event_id: debit_event.event_id,
        credit_event_id: credit_event.event_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::CurrencyRegistry;
    use rates::StaticOracle;

    fn state() -> LedgerState {
        LedgerState::new(CurrencyRegistry::standard())
    }

    fn oracle() -> StaticOracle {
        let oracle = StaticOracle::new();
        oracle.set_price(CurrencyCode::INR, 30_000 * PRICE_SCALE);
        oracle.set_price(CurrencyCode::BDT, 10_000 * PRICE_SCALE);
        oracle
    }

    fn alice() -> AccountId {
        AccountId::new("0xa11ce")
    }

    fn bob() -> AccountId {
        AccountId::new("0xb0b")
    }

    #[tokio::test]
    async fn test_double_conversion() {
        let mut state = state();
        state
            .balances
            .credit(&alice(), CurrencyCode::INR, 90_000 * PRICE_SCALE)
            .unwrap();
        state.journal.record(
            &alice(),
            CurrencyCode::INR,
            90_000 * PRICE_SCALE,
            EventKind::Deposit,
            None,
        );

        let outcome = transfer(
            &mut state,
            &oracle(),
            &alice(),
            &bob(),
            30_000 * PRICE_SCALE,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await
        .unwrap();

        // 30000e8 INR at 30000e8 INR/native = 1e8 native units,
        // recredited at 10000e8 BDT/native = 10000e8 BDT.
        assert_eq!(outcome.native_equivalent, PRICE_SCALE);
        assert_eq!(outcome.credited, 10_000 * PRICE_SCALE);
        assert_eq!(
            state.balances.balance(&alice(), CurrencyCode::INR),
            60_000 * PRICE_SCALE
        );
        assert_eq!(
            state.balances.balance(&bob(), CurrencyCode::BDT),
            10_000 * PRICE_SCALE
        );
        assert!(state.journal.reconciles(&state.balances).unwrap());
    }

    #[tokio::test]
    async fn test_self_transfer_rejected() {
        let mut state = state();
        let err = transfer(
            &mut state,
            &oracle(),
            &alice(),
            &alice(),
            100,
            CurrencyCode::INR,
            CurrencyCode::INR,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::SelfTransfer));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let mut state = state();
        let err = transfer(
            &mut state,
            &oracle(),
            &alice(),
            &bob(),
            0,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_insufficient_balance_aborts_without_mutation() {
        let mut state = state();
        let err = transfer(
            &mut state,
            &oracle(),
            &alice(),
            &bob(),
            100,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InsufficientBalance { .. })
        ));
        assert_eq!(state.balances.balance(&bob(), CurrencyCode::BDT), 0);
        assert!(state.journal.is_empty());
    }

    #[tokio::test]
    async fn test_credit_failure_rolls_debit_back() {
        let mut state = state();
        let oracle = StaticOracle::new();
        oracle.set_price(CurrencyCode::INR, PRICE_SCALE);
        oracle.set_price(CurrencyCode::BDT, PRICE_SCALE);

        state
            .balances
            .credit(&alice(), CurrencyCode::INR, 1_000)
            .unwrap();
        state
            .journal
            .record(&alice(), CurrencyCode::INR, 1_000, EventKind::Deposit, None);
        // receiver parked at the overflow boundary forces the credit leg to fail
        state
            .balances
            .credit(&bob(), CurrencyCode::BDT, u128::MAX)
            .unwrap();

        let err = transfer(
            &mut state,
            &oracle,
            &alice(),
            &bob(),
            500,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::Arithmetic(_))
        ));
        // sender restored to the pre-transfer balance, no events appended
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 1_000);
        assert_eq!(state.balances.balance(&bob(), CurrencyCode::BDT), u128::MAX);
        assert_eq!(state.journal.len(), 1);
    }

    #[tokio::test]
    async fn test_oracle_outage_aborts_before_any_mutation() {
        let mut state = state();
        let oracle = StaticOracle::new();
        oracle.set_price(CurrencyCode::INR, 30_000 * PRICE_SCALE);
        oracle.set_unavailable(CurrencyCode::BDT);

        state
            .balances
            .credit(&alice(), CurrencyCode::INR, 1_000)
            .unwrap();

        let err = transfer(
            &mut state,
            &oracle,
            &alice(),
            &bob(),
            50,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Oracle(rates::Error::Unavailable(_))));
        assert_eq!(state.balances.balance(&alice(), CurrencyCode::INR), 1_000);
        assert_eq!(state.balances.balance(&bob(), CurrencyCode::BDT), 0);
    }

    #[tokio::test]
    async fn test_unregistered_destination_rejected() {
        let mut state = state();
        let xyz = CurrencyCode::parse("XYZ").unwrap();
        let err = transfer(
            &mut state,
            &oracle(),
            &alice(),
            &bob(),
            100,
            CurrencyCode::INR,
            xyz,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(ledger_core::Error::InvalidCurrency(_))
        ));
    }
}
