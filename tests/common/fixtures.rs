//! Test fixtures and data factories
//!
//! Factories create real values; engines run against a temporary directory.

use depscope::core::models::{DependencyType, ExternalDependency, RequestMeasurement};
use depscope::monitoring::guard::FixedMemoryProbe;
use depscope::{Config, DiagnosticsEngine};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const GB: u64 = 1024 * 1024 * 1024;
const NANOS_PER_MS: u64 = 1_000_000;

/// Engine with its own data directory and a controllable memory probe
pub struct TestEngine {
    pub engine: DiagnosticsEngine,
    pub probe: Arc<FixedMemoryProbe>,
    pub dir: TempDir,
}

impl TestEngine {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Start from the default config pointed at a temp dir, then apply `configure`
    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_string_lossy().into_owned();
        config.guard.max_memory_bytes = Some(GB);
        configure(&mut config);

        let probe = Arc::new(FixedMemoryProbe::new(GB / 10, GB));
        let engine = DiagnosticsEngine::with_memory_probe(config, probe.clone())
            .expect("engine should build");
        Self { engine, probe, dir }
    }

    /// Wait for queued ingestion, failing the test on timeout
    pub fn drain(&self) {
        assert!(
            self.engine.wait_idle(Duration::from_secs(10)),
            "ingestion did not drain"
        );
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestEngine {
    type Target = DiagnosticsEngine;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

/// Factory for request measurements
pub struct MeasurementFactory;

impl MeasurementFactory {
    pub fn create(endpoint: &str, duration_ms: u64, status: u16, timestamp: i64) -> RequestMeasurement {
        RequestMeasurement::new(endpoint, duration_ms * NANOS_PER_MS, status, timestamp, "GET")
            .expect("valid measurement")
    }

    /// Successful request
    pub fn ok(endpoint: &str, duration_ms: u64, timestamp: i64) -> RequestMeasurement {
        Self::create(endpoint, duration_ms, 200, timestamp)
    }

    /// Server error
    pub fn error(endpoint: &str, duration_ms: u64, timestamp: i64) -> RequestMeasurement {
        Self::create(endpoint, duration_ms, 500, timestamp)
    }

    /// `count` requests with durations rising linearly from `from_ms` to `to_ms`
    pub fn linear(endpoint: &str, count: usize, from_ms: f64, to_ms: f64) -> Vec<RequestMeasurement> {
        let step = if count > 1 {
            (to_ms - from_ms) / (count - 1) as f64
        } else {
            0.0
        };
        (0..count)
            .map(|i| {
                let ms = from_ms + step * i as f64;
                RequestMeasurement::new(
                    endpoint,
                    (ms * NANOS_PER_MS as f64).round() as u64,
                    200,
                    i as i64 * 1000,
                    "GET",
                )
                .expect("valid measurement")
            })
            .collect()
    }
}

/// Factory for external dependencies
pub struct DependencyFactory;

impl DependencyFactory {
    pub fn database(id: &str) -> ExternalDependency {
        ExternalDependency::new(id, DependencyType::Database)
    }

    /// Critical dependency without redundancy
    pub fn critical(id: &str) -> ExternalDependency {
        Self::database(id).with_critical(true)
    }

    pub fn with_calls(id: &str, calls: u64) -> ExternalDependency {
        ExternalDependency::new(id, DependencyType::HttpService).with_call_count(calls)
    }
}
