//! Prometheus-backed metrics adapters, built with the `metrics` feature.

mod prometheus_join_metrics;

pub use prometheus_join_metrics::PrometheusJoinMetrics;
