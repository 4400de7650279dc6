//! Analysis configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Thresholds used by the health and trend analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Average response time (ms) above which an endpoint is a bottleneck
    #[serde(default = "default_slow_endpoint_threshold_ms")]
    pub slow_endpoint_threshold_ms: u64,
    /// Error rate above which an endpoint is flagged
    #[serde(default = "default_high_error_rate_threshold")]
    pub high_error_rate_threshold: f64,
    /// Number of standard deviations above the mean call count
    #[serde(default = "default_excessive_dependency_sigma")]
    pub excessive_dependency_sigma: f64,
    /// Minimum measurements before a trend is computed
    #[serde(default = "default_min_trend_data_points")]
    pub min_trend_data_points: usize,
    /// Relative increase of the recent half over the historical half
    #[serde(default = "default_degradation_threshold")]
    pub degradation_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            slow_endpoint_threshold_ms: default_slow_endpoint_threshold_ms(),
            high_error_rate_threshold: default_high_error_rate_threshold(),
            excessive_dependency_sigma: default_excessive_dependency_sigma(),
            min_trend_data_points: default_min_trend_data_points(),
            degradation_threshold: default_degradation_threshold(),
        }
    }
}

impl AnalysisConfig {
    /// Merge analysis configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.slow_endpoint_threshold_ms != default_slow_endpoint_threshold_ms() {
            self.slow_endpoint_threshold_ms = other.slow_endpoint_threshold_ms;
        }
        if other.high_error_rate_threshold != default_high_error_rate_threshold() {
            self.high_error_rate_threshold = other.high_error_rate_threshold;
        }
        if other.excessive_dependency_sigma != default_excessive_dependency_sigma() {
            self.excessive_dependency_sigma = other.excessive_dependency_sigma;
        }
        if other.min_trend_data_points != default_min_trend_data_points() {
            self.min_trend_data_points = other.min_trend_data_points;
        }
        if other.degradation_threshold != default_degradation_threshold() {
            self.degradation_threshold = other.degradation_threshold;
        }
        self
    }
}
