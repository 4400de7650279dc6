//! In-memory measurement store with overflow to disk

use super::persistence::{append_measurements, file_name_for, parse_file_date, read_measurements};
use crate::config::StorageConfig;
use crate::core::models::RequestMeasurement;
use crate::utils::error::{DiagnosticsError, Result};
use chrono::{Days, Local, NaiveDate};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type Series = Arc<Mutex<Vec<RequestMeasurement>>>;

/// Retention-bounded time-series storage keyed by endpoint
#[derive(Debug)]
pub struct MetricsStore {
    data_dir: PathBuf,
    retention_days: u32,
    max_cached_per_endpoint: usize,
    series: DashMap<String, Series>,
    /// Endpoints whose sanitized names collide share a file
    file_locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl MetricsStore {
    /// Create a store, creating the overflow directory if missing.
    ///
    /// Failing to create the directory is a configuration error.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let data_dir = config.data_path();
        fs::create_dir_all(&data_dir).map_err(|e| {
            DiagnosticsError::Config(format!(
                "Failed to create storage directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;

        info!("Metrics store initialized at: {}", data_dir.display());
        Ok(Self {
            data_dir,
            retention_days: config.data_retention_days,
            max_cached_per_endpoint: config.max_cached_metrics_per_endpoint,
            series: DashMap::new(),
            file_locks: DashMap::new(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn series_for(&self, endpoint: &str) -> Option<Series> {
        self.series.get(endpoint).map(|s| Arc::clone(s.value()))
    }

    /// Append a measurement; flushes the endpoint when it exceeds the cap.
    ///
    /// When the flush fails the oldest measurements are dropped, so the cache
    /// never holds more than the cap.
    pub fn store(&self, measurement: RequestMeasurement) {
        let endpoint = measurement.endpoint_id().to_string();
        let series = Arc::clone(
            self.series
                .entry(endpoint.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
                .value(),
        );

        let mut measurements = series.lock();
        measurements.push(measurement);
        if measurements.len() > self.max_cached_per_endpoint {
            debug!(
                endpoint = %endpoint,
                cached = measurements.len(),
                "Memory cache limit reached, flushing to disk"
            );
            self.flush_locked(&endpoint, &mut measurements);

            let excess = measurements
                .len()
                .saturating_sub(self.max_cached_per_endpoint);
            if excess > 0 {
                measurements.drain(..excess);
                warn!(
                    endpoint = %endpoint,
                    dropped = excess,
                    "Dropped cached measurements after a failed flush"
                );
            }
        }
    }

    /// Snapshot of the in-memory measurements, in insertion order
    pub fn get_metrics(&self, endpoint: &str) -> Vec<RequestMeasurement> {
        self.series_for(endpoint)
            .map(|s| s.lock().clone())
            .unwrap_or_default()
    }

    /// In-memory measurements with `start <= timestamp <= end`
    pub fn get_metrics_in_range(
        &self,
        endpoint: &str,
        start_millis: i64,
        end_millis: i64,
    ) -> Vec<RequestMeasurement> {
        self.filtered(endpoint, |m| {
            m.timestamp_millis() >= start_millis && m.timestamp_millis() <= end_millis
        })
    }

    /// In-memory measurements with an error status
    pub fn get_error_metrics(&self, endpoint: &str) -> Vec<RequestMeasurement> {
        self.filtered(endpoint, RequestMeasurement::is_error)
    }

    fn filtered<F>(&self, endpoint: &str, predicate: F) -> Vec<RequestMeasurement>
    where
        F: Fn(&RequestMeasurement) -> bool,
    {
        match self.series_for(endpoint) {
            Some(series) => series
                .lock()
                .iter()
                .filter(|m| predicate(m))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Endpoints with an in-memory series, sorted
    pub fn get_all_endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.series.iter().map(|e| e.key().clone()).collect();
        endpoints.sort();
        endpoints
    }

    pub fn memory_cache_size(&self, endpoint: &str) -> usize {
        self.series_for(endpoint).map(|s| s.lock().len()).unwrap_or(0)
    }

    pub fn clear_memory_cache(&self) {
        self.series.clear();
        info!("Cleared all metrics from memory cache");
    }

    /// Flush one endpoint's in-memory set to today's file.
    ///
    /// Returns the number of measurements written; I/O failures are logged and
    /// leave the in-memory set untouched.
    pub fn flush_to_disk(&self, endpoint: &str) -> usize {
        match self.series_for(endpoint) {
            Some(series) => {
                let mut measurements = series.lock();
                self.flush_locked(endpoint, &mut measurements)
            }
            None => 0,
        }
    }

    pub fn flush_all(&self) -> usize {
        self.get_all_endpoints()
            .iter()
            .map(|endpoint| self.flush_to_disk(endpoint))
            .sum()
    }

    /// Called with the series lock held, which serialises flushes per endpoint
    fn flush_locked(&self, endpoint: &str, measurements: &mut Vec<RequestMeasurement>) -> usize {
        if measurements.is_empty() {
            return 0;
        }

        let path = self.file_path(endpoint, Local::now().date_naive());
        let file_lock = Arc::clone(
            self.file_locks
                .entry(path.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let _guard = file_lock.lock();

        match append_measurements(&path, measurements) {
            Ok(total) => {
                let flushed = measurements.len();
                measurements.clear();
                debug!(
                    endpoint = %endpoint,
                    flushed,
                    file_total = total,
                    "Flushed metrics to {}",
                    path.display()
                );
                flushed
            }
            Err(e) => {
                error!(endpoint = %endpoint, "Failed to flush metrics to disk: {}", e);
                0
            }
        }
    }

    /// Measurements persisted today for an endpoint
    pub fn load_from_disk(&self, endpoint: &str) -> Vec<RequestMeasurement> {
        self.load_from_disk_on(endpoint, Local::now().date_naive())
    }

    /// Measurements persisted on `date`; empty when missing or unreadable
    pub fn load_from_disk_on(&self, endpoint: &str, date: NaiveDate) -> Vec<RequestMeasurement> {
        let path = self.file_path(endpoint, date);
        if !path.exists() {
            return Vec::new();
        }

        match read_measurements(&path) {
            Ok(measurements) => measurements,
            Err(e) => {
                error!(endpoint = %endpoint, "Failed to load metrics from disk: {}", e);
                Vec::new()
            }
        }
    }

    /// Delete overflow files older than the retention window
    pub fn cleanup_old_data(&self) -> usize {
        self.cleanup_old_data_at(Local::now().date_naive())
    }

    /// Retention cleanup relative to `today`.
    ///
    /// Files dated before `today - retention_days` are deleted. Names whose date does
    /// not parse are logged and kept.
    pub fn cleanup_old_data_at(&self, today: NaiveDate) -> usize {
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(self.retention_days)))
        else {
            return 0;
        };

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error during cleanup of {}: {}", self.data_dir.display(), e);
                return 0;
            }
        };

        let mut deleted = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match parse_file_date(name) {
                None => {}
                Some(Err(e)) => warn!("Skipping file during cleanup: {}", e),
                Some(Ok(date)) if date < cutoff => match fs::remove_file(&path) {
                    Ok(()) => {
                        self.file_locks.remove(&path);
                        deleted += 1;
                    }
                    Err(e) => error!("Failed to delete {}: {}", path.display(), e),
                },
                Some(Ok(_)) => {}
            }
        }

        if deleted > 0 {
            info!("Cleaned up {} old metric files", deleted);
        }
        deleted
    }

    fn file_path(&self, endpoint: &str, date: NaiveDate) -> PathBuf {
        self.data_dir.join(file_name_for(endpoint, date))
    }
}
