//! Section validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

fn check_ratio(name: &str, value: f64) -> Result<(), String> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(format!("{} must be in (0, 1], got {}", name, value));
    }
    Ok(())
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating analysis configuration");

        if self.slow_endpoint_threshold_ms == 0 {
            return Err("Slow endpoint threshold must be greater than 0".to_string());
        }
        check_ratio("High error rate threshold", self.high_error_rate_threshold)?;

        if !(self.excessive_dependency_sigma > 0.0) {
            return Err("Excessive dependency sigma must be positive".to_string());
        }

        if self.min_trend_data_points < 2 {
            return Err("Trend analysis needs at least 2 data points".to_string());
        }

        if !(self.degradation_threshold > 0.0) {
            return Err("Degradation threshold must be positive".to_string());
        }

        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.data_dir.trim().is_empty() {
            return Err("Storage data directory cannot be empty".to_string());
        }

        if self.data_retention_days == 0 {
            return Err("Data retention must be at least 1 day".to_string());
        }

        if self.max_cached_metrics_per_endpoint == 0 {
            return Err("Per-endpoint cache cap must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Validate for GuardConfig {
    fn validate(&self) -> Result<(), String> {
        check_ratio("Memory usage threshold", self.max_memory_usage_threshold)?;

        if self.max_memory_bytes == Some(0) {
            return Err("Max memory bytes must be greater than 0".to_string());
        }

        if self.resource_history_size == 0 {
            return Err("Resource history size must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Validate for ExecutorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.worker_threads == 0 {
            return Err("Worker threads must be at least 1".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Validate for SchedulerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cleanup_interval_secs == 0 {
            return Err("Cleanup interval must be greater than 0".to_string());
        }

        if self.limit_enforcement_interval_secs == 0 {
            return Err("Limit enforcement interval must be greater than 0".to_string());
        }

        if self.report_interval_secs == Some(0) {
            return Err("Report interval must be greater than 0 when set".to_string());
        }

        if self.resource_sample_interval_secs == 0 {
            return Err("Resource sample interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
