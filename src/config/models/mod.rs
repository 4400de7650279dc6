//! Configuration data models
//!
//! This module defines all configuration structures used throughout the engine.

#![allow(missing_docs)]

pub mod analysis;
pub mod executor;
pub mod guard;
pub mod logging;
pub mod scheduler;
pub mod storage;

// Re-export all configuration types
pub use analysis::*;
pub use executor::*;
pub use guard::*;
pub use logging::*;
pub use scheduler::*;
pub use storage::*;

/// Default slow endpoint threshold in milliseconds
pub fn default_slow_endpoint_threshold_ms() -> u64 {
    1000
}

/// Default error rate above which an endpoint is flagged
pub fn default_high_error_rate_threshold() -> f64 {
    0.05
}

/// Default sigma multiplier for the excessive dependency rule
pub fn default_excessive_dependency_sigma() -> f64 {
    3.0
}

/// Default minimum number of points for trend regression
pub fn default_min_trend_data_points() -> usize {
    10
}

/// Default relative latency increase that counts as degradation
pub fn default_degradation_threshold() -> f64 {
    0.20
}

/// Default overflow directory
pub fn default_data_dir() -> String {
    "./diagnostic-data/metrics".to_string()
}

/// Default retention in days
pub fn default_data_retention_days() -> u32 {
    7
}

/// Default in-memory cap per endpoint
pub fn default_max_cached_metrics_per_endpoint() -> usize {
    10_000
}

/// Default memory usage ratio that triggers degraded mode
pub fn default_max_memory_usage_threshold() -> f64 {
    0.9
}

/// Default ingestion worker count
pub fn default_worker_threads() -> usize {
    4
}

/// Default ingestion queue capacity
pub fn default_queue_capacity() -> usize {
    100
}

/// Default retention cleanup period in seconds
pub fn default_cleanup_interval_secs() -> u64 {
    3600
}

/// Default limit enforcement period in seconds
pub fn default_limit_enforcement_interval_secs() -> u64 {
    60
}

/// Default process resource sampling period in seconds
pub fn default_resource_sample_interval_secs() -> u64 {
    30
}

/// Default number of process resource samples kept in memory
pub fn default_resource_history_size() -> usize {
    10_000
}

/// Default delay before the first scheduled report
pub fn default_initial_report_delay_secs() -> u64 {
    30
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default true value
pub fn default_true() -> bool {
    true
}
