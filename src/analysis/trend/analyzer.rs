//! Per-endpoint trend analysis over the metrics store

use super::regression::{direction_for_slope, is_degrading, least_squares_slope};
use crate::config::AnalysisConfig;
use crate::core::models::{RequestMeasurement, TimeSeriesPoint, TrendAnalysis};
use crate::storage::MetricsStore;
use crate::utils::error::isolate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Detects rising/falling latency and degradation per endpoint
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    store: Arc<MetricsStore>,
    min_data_points: usize,
    degradation_threshold: f64,
}

impl TrendAnalyzer {
    pub fn new(store: Arc<MetricsStore>, config: &AnalysisConfig) -> Self {
        Self {
            store,
            min_data_points: config.min_trend_data_points,
            degradation_threshold: config.degradation_threshold,
        }
    }

    /// Trend of the endpoint's retained measurements; Stable when there are too few
    pub fn analyze_trend(&self, endpoint: &str) -> TrendAnalysis {
        self.analyze_measurements(endpoint, self.store.get_metrics(endpoint))
    }

    pub fn analyze_measurements(
        &self,
        endpoint: &str,
        mut measurements: Vec<RequestMeasurement>,
    ) -> TrendAnalysis {
        if measurements.len() < self.min_data_points {
            debug!(
                endpoint = %endpoint,
                points = measurements.len(),
                required = self.min_data_points,
                "Insufficient data points for trend analysis"
            );
            return TrendAnalysis::stable(endpoint);
        }

        measurements.sort_by_key(RequestMeasurement::timestamp_millis);
        let durations: Vec<f64> = measurements.iter().map(|m| m.duration_ms()).collect();

        let slope = least_squares_slope(&durations);
        TrendAnalysis {
            endpoint_id: endpoint.to_string(),
            direction: direction_for_slope(slope),
            change_rate: slope,
            degrading: is_degrading(&durations, slope, self.degradation_threshold),
        }
    }

    /// Trends of every endpoint in the store. Endpoints whose analysis fails are
    /// left out.
    pub fn analyze_all_trends(&self) -> BTreeMap<String, TrendAnalysis> {
        let mut trends = BTreeMap::new();
        for endpoint in self.store.get_all_endpoints() {
            let unit = format!("trend analysis of {}", endpoint);
            if let Ok(trend) = isolate(&unit, || Ok(self.analyze_trend(&endpoint))) {
                trends.insert(endpoint, trend);
            }
        }
        trends
    }

    /// Time-ordered latency points, optionally bounded by inclusive epoch millis
    pub fn get_time_series_data(
        &self,
        endpoint: &str,
        range: Option<(i64, i64)>,
    ) -> Vec<TimeSeriesPoint> {
        let mut measurements = match range {
            Some((start, end)) => self.store.get_metrics_in_range(endpoint, start, end),
            None => self.store.get_metrics(endpoint),
        };
        measurements.sort_by_key(RequestMeasurement::timestamp_millis);

        measurements
            .iter()
            .map(|m| TimeSeriesPoint {
                timestamp: m.timestamp_millis(),
                response_time_ms: m.duration_ms(),
                status_code: m.status_code(),
            })
            .collect()
    }
}
