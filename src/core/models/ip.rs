//! Client IP distribution values

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyLevel {
    Normal,
    Suspicious,
    Dangerous,
}

/// Traffic of a single client IP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpStatistics {
    pub ip: String,
    pub request_count: u64,
    pub error_count: u64,
    pub error_rate: f64,
    pub avg_response_time_ms: f64,
    /// Epoch millis
    pub first_request_time: i64,
    /// Epoch millis
    pub last_request_time: i64,
    pub endpoints_accessed: BTreeSet<String>,
    pub anomaly_level: AnomalyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_reason: Option<String>,
}

/// Client IP distribution of one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpDistribution {
    pub endpoint_id: String,
    pub total_requests: u64,
    pub unique_ips: usize,
    /// Busiest clients, most requests first
    pub top_ips: Vec<IpStatistics>,
    /// Share of requests coming from the busiest client
    pub concentration_rate: f64,
    pub anomalous: bool,
}

impl IpDistribution {
    pub fn empty(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            total_requests: 0,
            unique_ips: 0,
            top_ips: Vec::new(),
            concentration_rate: 0.0,
            anomalous: false,
        }
    }
}
