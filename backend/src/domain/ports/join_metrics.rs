//! Port for counting join outcomes.
//!
//! Recording is best effort. The service logs a failed write and carries on;
//! metrics never change what the caller sees.

use async_trait::async_trait;

use crate::domain::JoinOutcomeKind;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording join metrics.
    pub enum JoinMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "join metrics exporter failed: {message}",
    }
}

/// Metrics sink for join attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JoinMetrics: Send + Sync {
    /// Count one join attempt that ended in `kind`.
    async fn record(&self, kind: JoinOutcomeKind) -> Result<(), JoinMetricsError>;
}

/// Discards every write. Used when the `metrics` feature is off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpJoinMetrics;

#[async_trait]
impl JoinMetrics for NoOpJoinMetrics {
    async fn record(&self, _kind: JoinOutcomeKind) -> Result<(), JoinMetricsError> {
        Ok(())
    }
}
