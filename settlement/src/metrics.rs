//! Prometheus metrics for the settlement engine.

use std::sync::Arc;

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

use crate::{Error, Result};

/// Counters and timers exported by one engine instance.
///
/// Each engine owns its own registry so instances never collide.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Deposits settled.
    pub deposits_total: IntCounter,
    /// Withdrawals settled.
    pub withdrawals_total: IntCounter,
    /// Cross-border transfers settled.
    pub transfers_total: IntCounter,
    /// Operations rejected for any reason.
    pub failures_total: IntCounter,
    /// End-to-end operation latency in seconds.
    pub op_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let deposits_total =
            IntCounter::new("settlement_deposits_total", "Deposits settled")
                .map_err(|e| Error::Config(format!("metrics: {e}")))?;
        let withdrawals_total =
            IntCounter::new("settlement_withdrawals_total", "Withdrawals settled")
                .map_err(|e| Error::Config(format!("metrics: {e}")))?;
        let transfers_total =
            IntCounter::new("settlement_transfers_total", "Transfers settled")
                .map_err(|e| Error::Config(format!("metrics: {e}")))?;
        let failures_total =
            IntCounter::new("settlement_failures_total", "Operations rejected")
                .map_err(|e| Error::Config(format!("metrics: {e}")))?;
        let op_duration = Histogram::with_opts(HistogramOpts::new(
            "settlement_op_duration_seconds",
            "End-to-end operation latency",
        ))
        .map_err(|e| Error::Config(format!("metrics: {e}")))?;

        for collector in [
            &deposits_total,
            &withdrawals_total,
            &transfers_total,
            &failures_total,
        ] {
            registry
                .register(Box::new(collector.clone()))
                .map_err(|e| Error::Config(format!("metrics: {e}")))?;
        }
        registry
            .register(Box::new(op_duration.clone()))
            .map_err(|e| Error::Config(format!("metrics: {e}")))?;

        Ok(Self {
            registry: Arc::new(registry),
            deposits_total,
            withdrawals_total,
            transfers_total,
            failures_total,
            op_duration,
        })
    }

    /// The underlying registry, for exposition.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
