//! Per-endpoint statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of entries kept in [`EndpointStatistics::recent_errors`]
pub const MAX_RECENT_ERRORS: usize = 100;

/// One failed request, as shown in error listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Request timestamp (epoch millis)
    pub timestamp: i64,
    /// HTTP status code
    pub status_code: u16,
    /// HTTP method
    pub method: String,
    /// Endpoint identifier
    pub endpoint: String,
    /// Whole milliseconds
    pub duration_ms: u64,
}

/// Statistics snapshot of a single endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EndpointStatistics {
    /// Endpoint identifier
    pub endpoint_id: String,
    /// Number of measurements the snapshot was computed from
    pub total_requests: u64,
    /// Measurements with status >= 400
    pub error_count: u64,
    /// Requests per second over the observed time span
    pub qps: f64,
    /// Mean response time in milliseconds
    pub avg_response_time_ms: f64,
    /// Nearest-rank 95th percentile in milliseconds
    pub p95_ms: f64,
    /// Nearest-rank 99th percentile in milliseconds
    pub p99_ms: f64,
    /// `error_count / total_requests`, zero without requests
    pub error_rate: f64,
    /// Most recent errors, oldest first
    pub recent_errors: Vec<ErrorDetail>,
    /// Error count per status code
    pub error_status_distribution: BTreeMap<u16, u64>,
    /// Code location of the handler, when the instrumentation knows it
    pub source_location: Option<String>,
}

impl EndpointStatistics {
    /// Empty statistics for an endpoint
    pub fn new(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            ..Self::default()
        }
    }

    pub fn success_count(&self) -> u64 {
        self.total_requests.saturating_sub(self.error_count)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
