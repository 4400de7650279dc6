//! Resource guard configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Memory pressure guard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Usage ratio above which sampling is reduced
    #[serde(default = "default_max_memory_usage_threshold")]
    pub max_memory_usage_threshold: f64,
    /// Memory budget in bytes; the probe's total memory when absent
    #[serde(default)]
    pub max_memory_bytes: Option<u64>,
    /// Process resource samples kept in memory
    #[serde(default = "default_resource_history_size")]
    pub resource_history_size: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_memory_usage_threshold: default_max_memory_usage_threshold(),
            max_memory_bytes: None,
            resource_history_size: default_resource_history_size(),
        }
    }
}

impl GuardConfig {
    /// Merge guard configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.max_memory_usage_threshold != default_max_memory_usage_threshold() {
            self.max_memory_usage_threshold = other.max_memory_usage_threshold;
        }
        if other.max_memory_bytes.is_some() {
            self.max_memory_bytes = other.max_memory_bytes;
        }
        if other.resource_history_size != default_resource_history_size() {
            self.resource_history_size = other.resource_history_size;
        }
        self
    }
}
