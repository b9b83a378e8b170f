//! Prometheus adapter for join outcome counts.
//!
//! - **Name**: `trips_join_attempts_total`
//! - **Type**: Counter
//! - **Labels**: `outcome`, one of the [`JoinOutcomeKind`] labels.
//!
//! No user or trip identifiers are attached, which keeps label cardinality
//! fixed.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::JoinOutcomeKind;
use crate::domain::ports::{JoinMetrics, JoinMetricsError};

/// Metric name for join attempts.
pub const JOIN_ATTEMPTS_METRIC: &str = "trips_join_attempts_total";

/// Prometheus-backed join metrics recorder.
pub struct PrometheusJoinMetrics {
    attempts_total: IntCounterVec,
}

impl PrometheusJoinMetrics {
    /// Create the counter and register it with `registry`.
    ///
    /// # Errors
    ///
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let attempts_total = IntCounterVec::new(
            Opts::new(JOIN_ATTEMPTS_METRIC, "Trip join attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(attempts_total.clone()))?;
        Ok(Self { attempts_total })
    }
}

#[async_trait]
impl JoinMetrics for PrometheusJoinMetrics {
    async fn record(&self, kind: JoinOutcomeKind) -> Result<(), JoinMetricsError> {
        self.attempts_total
            .get_metric_with_label_values(&[kind.as_str()])
            .map_err(|err| JoinMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
