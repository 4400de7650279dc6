//! Configuration management for the diagnostics engine
//!
//! This module handles loading, validation and merging of the engine configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{DiagnosticsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix of all recognised environment variables
pub const ENV_PREFIX: &str = "DEPSCOPE_";

/// Main configuration struct for the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Health and trend thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Time-series storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Memory pressure guard
    #[serde(default)]
    pub guard: GuardConfig,
    /// Ingestion worker pool
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Background tasks
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| DiagnosticsError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| DiagnosticsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `DEPSCOPE_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from a variable lookup (keys without the prefix)
    pub(crate) fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SLOW_ENDPOINT_THRESHOLD_MS") {
            self.analysis.slow_endpoint_threshold_ms = parse_var("SLOW_ENDPOINT_THRESHOLD_MS", &v)?;
        }
        if let Some(v) = lookup("HIGH_ERROR_RATE_THRESHOLD") {
            self.analysis.high_error_rate_threshold = parse_var("HIGH_ERROR_RATE_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("DATA_DIR") {
            self.storage.data_dir = v;
        }
        if let Some(v) = lookup("DATA_RETENTION_DAYS") {
            self.storage.data_retention_days = parse_var("DATA_RETENTION_DAYS", &v)?;
        }
        if let Some(v) = lookup("MAX_CACHED_METRICS_PER_ENDPOINT") {
            self.storage.max_cached_metrics_per_endpoint =
                parse_var("MAX_CACHED_METRICS_PER_ENDPOINT", &v)?;
        }
        if let Some(v) = lookup("MAX_MEMORY_USAGE_THRESHOLD") {
            self.guard.max_memory_usage_threshold = parse_var("MAX_MEMORY_USAGE_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("MAX_MEMORY_BYTES") {
            self.guard.max_memory_bytes = Some(parse_var("MAX_MEMORY_BYTES", &v)?);
        }
        if let Some(v) = lookup("RESOURCE_HISTORY_SIZE") {
            self.guard.resource_history_size = parse_var("RESOURCE_HISTORY_SIZE", &v)?;
        }
        if let Some(v) = lookup("WORKER_THREADS") {
            self.executor.worker_threads = parse_var("WORKER_THREADS", &v)?;
        }
        if let Some(v) = lookup("QUEUE_CAPACITY") {
            self.executor.queue_capacity = parse_var("QUEUE_CAPACITY", &v)?;
        }
        if let Some(v) = lookup("REPORT_INTERVAL_SECS") {
            self.scheduler.report_interval_secs = Some(parse_var("REPORT_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = lookup("RESOURCE_SAMPLE_INTERVAL_SECS") {
            self.scheduler.resource_sample_interval_secs =
                parse_var("RESOURCE_SAMPLE_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_JSON") {
            self.logging.json = parse_var("LOG_JSON", &v)?;
        }
        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.analysis
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Analysis config error: {}", e)))?;
        self.storage
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Storage config error: {}", e)))?;
        self.guard
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Guard config error: {}", e)))?;
        self.executor
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Executor config error: {}", e)))?;
        self.scheduler
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Scheduler config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| DiagnosticsError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.analysis = self.analysis.merge(other.analysis);
        self.storage = self.storage.merge(other.storage);
        self.guard = self.guard.merge(other.guard);
        self.executor = self.executor.merge(other.executor);
        self.scheduler = self.scheduler.merge(other.scheduler);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DiagnosticsError::Config(format!("Failed to serialize config to JSON: {}", e))
        })
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            DiagnosticsError::Config(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        DiagnosticsError::Config(format!("Invalid value for {}{}: {}", ENV_PREFIX, key, e))
    })
}
