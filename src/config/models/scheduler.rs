//! Background scheduler configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Periods of the background tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Retention cleanup period in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Cache limit enforcement period in seconds
    #[serde(default = "default_limit_enforcement_interval_secs")]
    pub limit_enforcement_interval_secs: u64,
    /// Periodic report generation; disabled when absent
    #[serde(default)]
    pub report_interval_secs: Option<u64>,
    /// Delay before the first scheduled report
    #[serde(default = "default_initial_report_delay_secs")]
    pub initial_report_delay_secs: u64,
    /// Process resource sampling period in seconds
    #[serde(default = "default_resource_sample_interval_secs")]
    pub resource_sample_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: default_cleanup_interval_secs(),
            limit_enforcement_interval_secs: default_limit_enforcement_interval_secs(),
            report_interval_secs: None,
            initial_report_delay_secs: default_initial_report_delay_secs(),
            resource_sample_interval_secs: default_resource_sample_interval_secs(),
        }
    }
}

impl SchedulerConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn limit_enforcement_interval(&self) -> Duration {
        Duration::from_secs(self.limit_enforcement_interval_secs)
    }

    pub fn report_interval(&self) -> Option<Duration> {
        self.report_interval_secs.map(Duration::from_secs)
    }

    pub fn initial_report_delay(&self) -> Duration {
        Duration::from_secs(self.initial_report_delay_secs)
    }

    pub fn resource_sample_interval(&self) -> Duration {
        Duration::from_secs(self.resource_sample_interval_secs)
    }

    /// Merge scheduler configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.cleanup_interval_secs != default_cleanup_interval_secs() {
            self.cleanup_interval_secs = other.cleanup_interval_secs;
        }
        if other.limit_enforcement_interval_secs != default_limit_enforcement_interval_secs() {
            self.limit_enforcement_interval_secs = other.limit_enforcement_interval_secs;
        }
        if other.report_interval_secs.is_some() {
            self.report_interval_secs = other.report_interval_secs;
        }
        if other.initial_report_delay_secs != default_initial_report_delay_secs() {
            self.initial_report_delay_secs = other.initial_report_delay_secs;
        }
        if other.resource_sample_interval_secs != default_resource_sample_interval_secs() {
            self.resource_sample_interval_secs = other.resource_sample_interval_secs;
        }
        self
    }
}
