//! Latency trend values

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

/// Regression result for one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub endpoint_id: String,
    pub direction: TrendDirection,
    /// Regression slope, milliseconds per measurement index
    pub change_rate: f64,
    pub degrading: bool,
}

impl TrendAnalysis {
    /// Result used when there is not enough data
    pub fn stable(endpoint_id: impl Into<String>) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            direction: TrendDirection::Stable,
            change_rate: 0.0,
            degrading: false,
        }
    }
}

/// One point of an endpoint's latency time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Epoch millis
    pub timestamp: i64,
    pub response_time_ms: f64,
    pub status_code: u16,
}
