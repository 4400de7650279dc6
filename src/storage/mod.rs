//! Storage layer
//!
//! Retention-bounded time-series storage of raw request measurements.

pub mod metrics;

pub use metrics::MetricsStore;
