//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL via Diesel
//! - **memory**: in-process adapters for local runs and tests
//! - **metrics**: Prometheus exporters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure types. They
//! hold no business rules.

pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
