//! Metrics storage configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Time-series storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving overflow files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Overflow files older than this many days are deleted
    #[serde(default = "default_data_retention_days")]
    pub data_retention_days: u32,
    /// In-memory measurements per endpoint before a flush
    #[serde(default = "default_max_cached_metrics_per_endpoint")]
    pub max_cached_metrics_per_endpoint: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            data_retention_days: default_data_retention_days(),
            max_cached_metrics_per_endpoint: default_max_cached_metrics_per_endpoint(),
        }
    }
}

impl StorageConfig {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Merge storage configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.data_dir != default_data_dir() {
            self.data_dir = other.data_dir;
        }
        if other.data_retention_days != default_data_retention_days() {
            self.data_retention_days = other.data_retention_days;
        }
        if other.max_cached_metrics_per_endpoint != default_max_cached_metrics_per_endpoint() {
            self.max_cached_metrics_per_endpoint = other.max_cached_metrics_per_endpoint;
        }
        self
    }
}
