//! Core DiagnosticsEngine implementation

use crate::analysis::{HealthAnalyzer, IpAnalyzer, TrendAnalyzer, assemble_report};
use crate::config::Config;
use crate::core::models::{
    ArchitectureRisk, DependencyLink, EndpointStatistics, ErrorDetail, ExternalDependency,
    HealthReport, IpDistribution, RequestMeasurement, ResourceSample, TimeSeriesPoint,
    TrendAnalysis,
};
use crate::registry::DependencyRegistry;
use crate::storage::MetricsStore;
use crate::topology::{DependencyTopology, TopologyBuilder};
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::executor::{BackgroundScheduler, IngestionPool, PoolStats};
use super::guard::{MemoryProbe, MemoryStatus, ResourceGuard};
use super::resources::{ResourceReader, ResourceSampler, SystemResourceReader};
use super::statistics::StatisticsAggregator;

/// Produces health reports from the analyzers
#[derive(Debug, Clone)]
pub(super) struct ReportSources {
    pub(super) health: Arc<HealthAnalyzer>,
    pub(super) trends: TrendAnalyzer,
}

impl ReportSources {
    pub(super) fn generate(&self) -> HealthReport {
        let context = self.health.context();
        let risks = self.health.analyze_context(&context);
        let trends = self.trends.analyze_all_trends();
        assemble_report(&context.topology, risks, context.statistics, trends)
    }
}

/// The diagnostics engine.
///
/// Cheap to clone; clones share all state. Ingestion is fire-and-forget and runs
/// on the ingestion pool; queries read point-in-time snapshots.
#[derive(Debug, Clone)]
pub struct DiagnosticsEngine {
    pub(super) config: Arc<Config>,
    pub(super) store: Arc<MetricsStore>,
    pub(super) registry: Arc<DependencyRegistry>,
    pub(super) aggregator: Arc<StatisticsAggregator>,
    pub(super) guard: Arc<ResourceGuard>,
    pub(super) sampler: Arc<ResourceSampler>,
    pub(super) reports: ReportSources,
    topology_builder: TopologyBuilder,
    ips: IpAnalyzer,
    pool: Arc<IngestionPool>,
    scheduler: Arc<Mutex<Option<BackgroundScheduler>>>,
    start_time: Instant,
}

impl DiagnosticsEngine {
    /// Create an engine reading memory and resources of the current process.
    ///
    /// Fails only for invalid configuration or an unusable storage directory.
    pub fn new(config: Config) -> Result<Self> {
        let guard = ResourceGuard::new(
            &config.guard,
            config.storage.max_cached_metrics_per_endpoint,
        );
        let sampler = ResourceSampler::new(config.guard.resource_history_size);
        Self::build(config, guard, sampler)
    }

    /// Create an engine whose resource guard reads memory from `probe`
    pub fn with_memory_probe(config: Config, probe: Arc<dyn MemoryProbe>) -> Result<Self> {
        Self::with_readers(config, probe, Arc::new(SystemResourceReader))
    }

    /// Create an engine with both the guard's memory source and the resource
    /// sampler's reader supplied by the caller
    pub fn with_readers(
        config: Config,
        probe: Arc<dyn MemoryProbe>,
        reader: Arc<dyn ResourceReader>,
    ) -> Result<Self> {
        let guard = ResourceGuard::with_probe(
            &config.guard,
            config.storage.max_cached_metrics_per_endpoint,
            probe,
        );
        let sampler = ResourceSampler::with_reader(config.guard.resource_history_size, reader);
        Self::build(config, guard, sampler)
    }

    fn build(config: Config, guard: ResourceGuard, sampler: ResourceSampler) -> Result<Self> {
        info!("Initializing diagnostics engine");
        config.validate()?;

        let store = Arc::new(MetricsStore::new(&config.storage)?);
        let registry = Arc::new(DependencyRegistry::new());
        let aggregator = Arc::new(StatisticsAggregator::new(
            Arc::clone(&store),
            config.analysis.slow_endpoint_threshold_ms,
            config.storage.max_cached_metrics_per_endpoint,
        ));
        let health = Arc::new(HealthAnalyzer::new(
            Arc::clone(&registry),
            Arc::clone(&aggregator),
            config.analysis.clone(),
        ));
        let trends = TrendAnalyzer::new(Arc::clone(&store), &config.analysis);
        let pool = Arc::new(IngestionPool::new(&config.executor)?);

        info!("Diagnostics engine initialized successfully");
        Ok(Self {
            topology_builder: TopologyBuilder::new(Arc::clone(&registry)),
            ips: IpAnalyzer::new(Arc::clone(&store)),
            reports: ReportSources { health, trends },
            config: Arc::new(config),
            store,
            registry,
            aggregator,
            guard: Arc::new(guard),
            sampler: Arc::new(sampler),
            pool,
            scheduler: Arc::new(Mutex::new(None)),
            start_time: Instant::now(),
        })
    }

    /// Start the background scheduler and its periodic tasks
    pub fn start(&self) -> Result<()> {
        let mut slot = self.scheduler.lock();
        if slot.is_some() {
            warn!("Diagnostics engine already started");
            return Ok(());
        }

        info!("Starting diagnostics engine");
        let scheduler = BackgroundScheduler::new()?;
        self.schedule_background_tasks(&scheduler)?;
        *slot = Some(scheduler);

        info!("Diagnostics engine started successfully");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.scheduler.lock().is_some()
    }

    /// Stop background work, drain queued ingestion and flush cached measurements
    /// to disk
    pub fn shutdown(&self) {
        info!("Stopping diagnostics engine");
        if let Some(scheduler) = self.scheduler.lock().take() {
            scheduler.shutdown();
        }
        self.pool.shutdown();

        let flushed = self.store.flush_all();
        info!(flushed, "Diagnostics engine stopped");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    // ==================== Ingestion ====================

    /// Hand a measurement to the ingestion pool. Invalid measurements are logged
    /// and dropped.
    pub fn ingest(&self, measurement: RequestMeasurement) {
        if let Err(e) = measurement.validate() {
            warn!("Dropping invalid measurement: {}", e);
            return;
        }

        let store = Arc::clone(&self.store);
        let aggregator = Arc::clone(&self.aggregator);
        self.pool.submit(move || {
            store.store(measurement.clone());
            aggregator.update(measurement);
            Ok(())
        });
    }

    /// Ingest only if the resource guard admits it; returns whether it did
    pub fn ingest_sampled(&self, measurement: RequestMeasurement) -> bool {
        if !self.guard.can_collect_metric() {
            debug!(endpoint = %measurement.endpoint_id(), "Measurement sampled out");
            return false;
        }
        self.ingest(measurement);
        true
    }

    /// Admission check for instrumentation, before it builds a measurement
    pub fn can_collect_metric(&self) -> bool {
        self.guard.can_collect_metric()
    }

    /// Block until queued ingestion has finished or `timeout` elapses
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.pool.wait_idle(timeout)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    // ==================== Dependencies ====================

    pub fn register_dependency(&self, dependency: ExternalDependency) -> Result<()> {
        self.registry.register(dependency)
    }

    pub fn remove_dependency(&self, id: &str) -> Option<ExternalDependency> {
        self.registry.remove(id)
    }

    pub fn clear_dependencies(&self) {
        self.registry.clear();
    }

    pub fn register_link(&self, link: DependencyLink) -> Result<()> {
        self.registry.register_link(link)
    }

    pub fn dependencies(&self) -> Vec<ExternalDependency> {
        self.registry.snapshot()
    }

    // ==================== Statistics ====================

    pub fn get_statistics(&self, endpoint: &str) -> Option<EndpointStatistics> {
        self.aggregator.get_statistics(endpoint)
    }

    pub fn get_all_statistics(&self) -> BTreeMap<String, EndpointStatistics> {
        self.aggregator.get_all_statistics()
    }

    pub fn refresh_statistics(&self, endpoint: &str) {
        self.aggregator.refresh_statistics(endpoint);
    }

    pub fn refresh_all_statistics(&self) {
        self.aggregator.refresh_all_statistics();
    }

    pub fn get_error_details(&self, endpoint: &str) -> Vec<ErrorDetail> {
        self.aggregator.get_error_details(endpoint)
    }

    // ==================== Analysis ====================

    pub fn build_topology(&self) -> DependencyTopology {
        self.topology_builder.build_topology()
    }

    pub fn analyze_risks(&self) -> Vec<ArchitectureRisk> {
        self.reports.health.analyze_risks()
    }

    pub fn analyze_trend(&self, endpoint: &str) -> TrendAnalysis {
        self.reports.trends.analyze_trend(endpoint)
    }

    pub fn analyze_all_trends(&self) -> BTreeMap<String, TrendAnalysis> {
        self.reports.trends.analyze_all_trends()
    }

    /// Latency points of an endpoint, optionally limited to `[start, end]` millis
    pub fn get_time_series_data(
        &self,
        endpoint: &str,
        range: Option<(i64, i64)>,
    ) -> Vec<TimeSeriesPoint> {
        self.reports.trends.get_time_series_data(endpoint, range)
    }

    pub fn ip_distribution(&self, endpoint: &str) -> IpDistribution {
        self.ips.analyze_endpoint(endpoint)
    }

    pub fn generate_report(&self) -> HealthReport {
        self.reports.generate()
    }

    // ==================== Resources ====================

    pub fn memory_status(&self) -> MemoryStatus {
        self.guard.memory_status()
    }

    /// Take a process resource sample now and add it to the history
    pub fn sample_resources(&self) -> Option<ResourceSample> {
        self.sampler.sample()
    }

    pub fn latest_resource_sample(&self) -> Option<ResourceSample> {
        self.sampler.latest()
    }

    /// Retained resource samples, oldest first
    pub fn resource_samples(&self) -> Vec<ResourceSample> {
        self.sampler.samples()
    }

    /// Retained resource samples within `[start, end]` millis
    pub fn resource_samples_between(&self, start: i64, end: i64) -> Vec<ResourceSample> {
        self.sampler.samples_between(start, end)
    }

    /// Trim the aggregator's per-endpoint logs to the configured cap
    pub fn enforce_metric_limit(&self) -> usize {
        self.guard.enforce_metric_limit(self.aggregator.as_ref())
    }

    /// Delete overflow files past the retention window
    pub fn cleanup_old_data(&self) -> usize {
        self.store.cleanup_old_data()
    }

    pub fn store(&self) -> &Arc<MetricsStore> {
        &self.store
    }
}
