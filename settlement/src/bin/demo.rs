//! End-to-end settlement walkthrough.
//!
//! Spins up the engine against static price feeds, runs deposits, a
//! cross-border transfer, and a withdrawal, then prints the audit log.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use ledger_core::{AccountId, CurrencyCode, PRICE_SCALE};
use rates::{OracleAdapter, StaticFeed};
use settlement::{Config, NoopCustody, SettlementEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(service = %config.service_name, "Starting settlement demo");

    // Native asset priced at 30,000 INR and 105,000 BDT per unit.
    let oracle = OracleAdapter::new()
        .with_timeout(Duration::from_millis(config.oracle.timeout_ms))
        .with_max_age(Duration::from_secs(config.oracle.max_age_secs))
        .with_feed(
            CurrencyCode::INR,
            Arc::new(StaticFeed::with_price(30_000 * PRICE_SCALE)),
        )
        .with_feed(
            CurrencyCode::BDT,
            Arc::new(StaticFeed::with_price(105_000 * PRICE_SCALE)),
        );

    let engine = SettlementEngine::new(&config, Arc::new(oracle), Arc::new(NoopCustody))?;

    let alice = AccountId::new("0xa11ce");
    let bob = AccountId::new("0xb0b");

    // Alice funds her INR balance with 3 native units.
    let deposit = engine
        .deposit(alice.clone(), CurrencyCode::INR, 3 * PRICE_SCALE)
        .await?;
    println!(
        "deposited: {} INR units to {} (price {})",
        deposit.credited, alice, deposit.price
    );

    // Cross-border: a third of her INR lands as BDT with Bob.
    let outcome = engine
        .transfer(
            alice.clone(),
            bob.clone(),
            30_000 * PRICE_SCALE,
            CurrencyCode::INR,
            CurrencyCode::BDT,
        )
        .await?;
    println!(
        "transferred: {} INR -> {} BDT via {} native units (id {})",
        30_000 * PRICE_SCALE,
        outcome.credited,
        outcome.native_equivalent,
        outcome.transfer_id
    );

    // Bob cashes half of it back out to the reserve.
    let withdrawal = engine
        .withdraw(bob.clone(), CurrencyCode::BDT, outcome.credited / 2)
        .await?;
    println!(
        "withdrew: {} native units released to {}",
        withdrawal.native_released, bob
    );

    println!(
        "alice INR: {}",
        engine.balance(alice.clone(), CurrencyCode::INR).await?
    );
    println!(
        "bob BDT:   {}",
        engine.balance(bob.clone(), CurrencyCode::BDT).await?
    );
    println!("reconciled: {}", engine.reconciled().await?);

    println!("audit log:");
    for event in engine.all_events().await? {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    engine.shutdown().await;
    Ok(())
}
