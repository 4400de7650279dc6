//! Adaptive sampling under memory pressure

use super::memory::{MemoryProbe, SystemMemoryProbe};
use crate::config::GuardConfig;
use crate::core::models::RequestMeasurement;
use dashmap::DashMap;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, warn};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Usage at or above which only 5% of measurements are admitted
const CRITICAL_USAGE: f64 = 0.95;
/// Usage at or above which only 10% of measurements are admitted
const SEVERE_USAGE: f64 = 0.92;

/// A keyed cache of measurement lists that can be trimmed from the front
pub trait MeasurementCache {
    /// Current list length per endpoint
    fn endpoint_lengths(&self) -> Vec<(String, usize)>;

    /// Drop the oldest entries of `endpoint` until at most `max_len` remain.
    ///
    /// The length is checked again under the endpoint's lock; returns the number removed.
    fn trim_front(&self, endpoint: &str, max_len: usize) -> usize;
}

impl MeasurementCache for DashMap<String, Vec<RequestMeasurement>> {
    fn endpoint_lengths(&self) -> Vec<(String, usize)> {
        self.iter().map(|e| (e.key().clone(), e.value().len())).collect()
    }

    fn trim_front(&self, endpoint: &str, max_len: usize) -> usize {
        match self.get_mut(endpoint) {
            Some(mut list) if list.len() > max_len => {
                let excess = list.len() - max_len;
                list.drain(..excess);
                excess
            }
            _ => 0,
        }
    }
}

/// Diagnostic snapshot of the guard and the memory it watches
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStatus {
    /// Budget the usage ratio is computed against
    pub max_memory_mb: u64,
    /// Memory reported by the probe
    pub total_memory_mb: u64,
    pub used_memory_mb: u64,
    pub free_memory_mb: u64,
    pub usage_ratio: f64,
    pub degraded: bool,
    pub current_sampling_rate: f64,
}

/// Memory-pressure admission control
#[derive(Debug)]
pub struct ResourceGuard {
    probe: Arc<dyn MemoryProbe>,
    max_memory_bytes: u64,
    threshold: f64,
    max_cached_metrics: usize,
    /// f64 bits
    sampling_rate: AtomicU64,
    degraded: AtomicBool,
}

impl ResourceGuard {
    /// Guard backed by the host memory probe
    pub fn new(config: &GuardConfig, max_cached_metrics: usize) -> Self {
        Self::with_probe(config, max_cached_metrics, Arc::new(SystemMemoryProbe))
    }

    pub fn with_probe(
        config: &GuardConfig,
        max_cached_metrics: usize,
        probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        let max_memory_bytes = config
            .max_memory_bytes
            .unwrap_or_else(|| probe.total_bytes());

        debug!(
            max_memory_bytes,
            threshold = config.max_memory_usage_threshold,
            "Resource guard initialized"
        );
        Self {
            probe,
            max_memory_bytes,
            threshold: config.max_memory_usage_threshold,
            max_cached_metrics,
            sampling_rate: AtomicU64::new(1.0f64.to_bits()),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether the next measurement should be collected
    pub fn can_collect_metric(&self) -> bool {
        self.can_collect_metric_with(&mut rand::thread_rng())
    }

    /// [`Self::can_collect_metric`] with a caller supplied random source
    pub fn can_collect_metric_with<R: Rng>(&self, rng: &mut R) -> bool {
        let usage = self.memory_usage_ratio();

        if usage > self.threshold {
            if !self.degraded.swap(true, Ordering::AcqRel) {
                warn!(
                    "Memory usage {:.1}% exceeds threshold {:.1}%, entering degraded mode",
                    usage * 100.0,
                    self.threshold * 100.0
                );
            }
            let rate = self.degraded_sampling_rate(usage);
            self.set_sampling_rate(rate);
            rng.gen_range(0.0..1.0) < rate
        } else {
            if self.degraded.swap(false, Ordering::AcqRel) {
                info!("Memory usage normalized, exiting degraded mode");
            }
            self.set_sampling_rate(1.0);
            true
        }
    }

    fn degraded_sampling_rate(&self, usage: f64) -> f64 {
        if usage >= CRITICAL_USAGE {
            0.05
        } else if usage >= SEVERE_USAGE {
            0.10
        } else if usage >= self.threshold {
            0.30
        } else {
            1.0
        }
    }

    fn set_sampling_rate(&self, rate: f64) {
        self.sampling_rate.store(rate.to_bits(), Ordering::Release);
    }

    /// Used memory over the configured budget; zero when the budget is unknown
    pub fn memory_usage_ratio(&self) -> f64 {
        if self.max_memory_bytes == 0 {
            return 0.0;
        }
        self.probe.used_bytes() as f64 / self.max_memory_bytes as f64
    }

    pub fn memory_usage_mb(&self) -> u64 {
        self.probe.used_bytes() / BYTES_PER_MB
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    pub fn current_sampling_rate(&self) -> f64 {
        f64::from_bits(self.sampling_rate.load(Ordering::Acquire))
    }

    pub fn max_cached_metrics(&self) -> usize {
        self.max_cached_metrics
    }

    /// Trim every endpoint list above the cap; returns the number of entries removed
    pub fn enforce_metric_limit<C: MeasurementCache + ?Sized>(&self, cache: &C) -> usize {
        let mut removed = 0;
        for (endpoint, len) in cache.endpoint_lengths() {
            if len > self.max_cached_metrics {
                let trimmed = cache.trim_front(&endpoint, self.max_cached_metrics);
                if trimmed > 0 {
                    debug!(
                        endpoint = %endpoint,
                        removed = trimmed,
                        "Removed old metrics to enforce limit"
                    );
                }
                removed += trimmed;
            }
        }
        removed
    }

    pub fn memory_status(&self) -> MemoryStatus {
        let used = self.probe.used_bytes();
        let total = self.probe.total_bytes();
        MemoryStatus {
            max_memory_mb: self.max_memory_bytes / BYTES_PER_MB,
            total_memory_mb: total / BYTES_PER_MB,
            used_memory_mb: used / BYTES_PER_MB,
            free_memory_mb: total.saturating_sub(used) / BYTES_PER_MB,
            usage_ratio: self.memory_usage_ratio(),
            degraded: self.is_degraded(),
            current_sampling_rate: self.current_sampling_rate(),
        }
    }
}
