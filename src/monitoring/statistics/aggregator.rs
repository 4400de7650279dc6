//! Live per-endpoint statistics

use super::helpers::{compute_statistics, recent_error_details};
use crate::core::models::{EndpointStatistics, ErrorDetail, RequestMeasurement};
use crate::monitoring::guard::MeasurementCache;
use crate::storage::MetricsStore;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Append log of one endpoint. `version` grows with every append.
#[derive(Debug, Default)]
struct EndpointLog {
    measurements: Vec<RequestMeasurement>,
    version: u64,
}

#[derive(Debug)]
struct CachedStatistics {
    statistics: EndpointStatistics,
    version: u64,
}

/// Maintains an [`EndpointStatistics`] per endpoint.
///
/// Every update recomputes the endpoint from its log, which holds at most
/// `max_cached_metrics` of the most recent measurements. Commits are versioned so
/// that a slower recomputation never overwrites one that saw more data.
#[derive(Debug)]
pub struct StatisticsAggregator {
    store: Arc<MetricsStore>,
    slow_endpoint_threshold_ms: u64,
    max_cached_metrics: usize,
    logs: DashMap<String, Arc<Mutex<EndpointLog>>>,
    statistics: DashMap<String, CachedStatistics>,
}

impl StatisticsAggregator {
    pub fn new(
        store: Arc<MetricsStore>,
        slow_endpoint_threshold_ms: u64,
        max_cached_metrics: usize,
    ) -> Self {
        Self {
            store,
            slow_endpoint_threshold_ms,
            max_cached_metrics: max_cached_metrics.max(1),
            logs: DashMap::new(),
            statistics: DashMap::new(),
        }
    }

    fn log_for(&self, endpoint: &str) -> Arc<Mutex<EndpointLog>> {
        if let Some(log) = self.logs.get(endpoint) {
            return Arc::clone(log.value());
        }
        Arc::clone(
            self.logs
                .entry(endpoint.to_string())
                .or_default()
                .value(),
        )
    }

    /// Append a measurement and recompute its endpoint
    pub fn update(&self, measurement: RequestMeasurement) {
        let endpoint = measurement.endpoint_id().to_string();
        let log = self.log_for(&endpoint);

        let (snapshot, version) = {
            let mut log = log.lock();
            log.measurements.push(measurement);
            let excess = log.measurements.len().saturating_sub(self.max_cached_metrics);
            if excess > 0 {
                log.measurements.drain(..excess);
            }
            log.version += 1;
            (log.measurements.clone(), log.version)
        };

        let statistics = self.compute(&endpoint, &snapshot);
        self.commit(endpoint, statistics, version);
    }

    fn commit(&self, endpoint: String, statistics: EndpointStatistics, version: u64) {
        match self.statistics.entry(endpoint) {
            Entry::Occupied(mut entry) => {
                if entry.get().version < version {
                    entry.insert(CachedStatistics {
                        statistics,
                        version,
                    });
                } else {
                    debug!(endpoint = %entry.key(), version, "Skipped stale statistics");
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(CachedStatistics {
                    statistics,
                    version,
                });
            }
        }
    }

    /// Recompute from `measurements`, taking error details from the freshest source
    fn compute(&self, endpoint: &str, measurements: &[RequestMeasurement]) -> EndpointStatistics {
        let stored_errors = self.store.get_error_metrics(endpoint);
        let memory_errors = measurements.iter().filter(|m| m.is_error()).count();

        if !stored_errors.is_empty() {
            if stored_errors.len().abs_diff(memory_errors) > 10 {
                debug!(
                    endpoint = %endpoint,
                    storage = stored_errors.len(),
                    memory = memory_errors,
                    "Storage and memory error counts differ"
                );
            }
            return compute_statistics(endpoint, measurements, &stored_errors);
        }

        if memory_errors > 0 {
            warn!(
                endpoint = %endpoint,
                error_count = memory_errors,
                "No error metrics in storage, rebuilding error details from memory"
            );
        }
        let errors: Vec<RequestMeasurement> = measurements
            .iter()
            .filter(|m| m.is_error())
            .cloned()
            .collect();
        compute_statistics(endpoint, measurements, &errors)
    }

    pub fn get_statistics(&self, endpoint: &str) -> Option<EndpointStatistics> {
        self.statistics.get(endpoint).map(|c| c.statistics.clone())
    }

    /// Copy of every endpoint's statistics
    pub fn get_all_statistics(&self) -> BTreeMap<String, EndpointStatistics> {
        self.statistics
            .iter()
            .map(|e| (e.key().clone(), e.value().statistics.clone()))
            .collect()
    }

    /// Most recent errors (at most 100), from storage when it has any
    pub fn get_error_details(&self, endpoint: &str) -> Vec<ErrorDetail> {
        let stored = self.store.get_error_metrics(endpoint);
        if !stored.is_empty() {
            return recent_error_details(&stored);
        }

        match self.logs.get(endpoint).map(|l| Arc::clone(l.value())) {
            Some(log) => {
                let log = log.lock();
                recent_error_details(log.measurements.iter().filter(|m| m.is_error()))
            }
            None => Vec::new(),
        }
    }

    /// Replace the cached statistics with a recomputation from the store.
    ///
    /// Does nothing when the store holds no measurements for the endpoint.
    pub fn refresh_statistics(&self, endpoint: &str) {
        let measurements = self.store.get_metrics(endpoint);
        if measurements.is_empty() {
            debug!(endpoint = %endpoint, "Nothing to refresh");
            return;
        }

        let version = self
            .logs
            .get(endpoint)
            .map(|l| l.value().lock().version)
            .unwrap_or(0);
        let statistics = self.compute(endpoint, &measurements);
        self.statistics.insert(
            endpoint.to_string(),
            CachedStatistics {
                statistics,
                version,
            },
        );
    }

    pub fn refresh_all_statistics(&self) {
        for endpoint in self.store.get_all_endpoints() {
            self.refresh_statistics(&endpoint);
        }
    }

    pub fn is_slow_endpoint(&self, endpoint: &str) -> bool {
        self.statistics
            .get(endpoint)
            .map(|c| c.statistics.avg_response_time_ms > self.slow_endpoint_threshold_ms as f64)
            .unwrap_or(false)
    }

    pub fn endpoint_count(&self) -> usize {
        self.statistics.len()
    }

    /// Drop every log and cached statistic
    pub fn clear(&self) {
        self.logs.clear();
        self.statistics.clear();
    }
}

impl MeasurementCache for StatisticsAggregator {
    fn endpoint_lengths(&self) -> Vec<(String, usize)> {
        self.logs
            .iter()
            .map(|e| (e.key().clone(), e.value().lock().measurements.len()))
            .collect()
    }

    fn trim_front(&self, endpoint: &str, max_len: usize) -> usize {
        let Some(log) = self.logs.get(endpoint).map(|l| Arc::clone(l.value())) else {
            return 0;
        };
        let mut log = log.lock();
        if log.measurements.len() <= max_len {
            return 0;
        }
        let excess = log.measurements.len() - max_len;
        log.measurements.drain(..excess);
        excess
    }
}
