//! Background task implementations for DiagnosticsEngine

use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::executor::BackgroundScheduler;
use super::system::DiagnosticsEngine;

impl DiagnosticsEngine {
    /// Register the periodic tasks on `scheduler`.
    ///
    /// Tasks capture the components they need, never the engine itself, so the
    /// engine can be dropped while the scheduler runs.
    pub(super) fn schedule_background_tasks(&self, scheduler: &BackgroundScheduler) -> Result<()> {
        let schedule = &self.config.scheduler;

        // Retention cleanup
        let store = Arc::clone(&self.store);
        scheduler.schedule_at_fixed_rate(
            "retention cleanup",
            Duration::ZERO,
            schedule.cleanup_interval(),
            move || {
                let deleted = store.cleanup_old_data();
                debug!(deleted, "Retention cleanup finished");
                Ok(())
            },
        )?;

        // Metric limit enforcement
        let guard = Arc::clone(&self.guard);
        let aggregator = Arc::clone(&self.aggregator);
        scheduler.schedule_at_fixed_rate(
            "metric limit enforcement",
            schedule.limit_enforcement_interval(),
            schedule.limit_enforcement_interval(),
            move || {
                let removed = guard.enforce_metric_limit(aggregator.as_ref());
                if removed > 0 {
                    debug!(removed, "Trimmed cached measurements");
                }
                if guard.is_degraded() {
                    warn!(
                        sampling_rate = guard.current_sampling_rate(),
                        "Diagnostics running in degraded mode"
                    );
                }
                Ok(())
            },
        )?;

        // Process resource sampling
        let sampler = Arc::clone(&self.sampler);
        scheduler.schedule_at_fixed_rate(
            "resource sampling",
            Duration::ZERO,
            schedule.resource_sample_interval(),
            move || {
                if let Some(sample) = sampler.sample() {
                    debug!(
                        memory_bytes = sample.memory_bytes,
                        cpu_usage = sample.cpu_usage,
                        threads = ?sample.thread_count,
                        "Sampled process resources"
                    );
                }
                Ok(())
            },
        )?;

        // Scheduled health reports
        if let Some(period) = schedule.report_interval() {
            let reports = self.reports.clone();
            scheduler.schedule_at_fixed_rate(
                "health report",
                schedule.initial_report_delay(),
                period,
                move || {
                    let report = reports.generate();
                    let summary = &report.summary;
                    info!(
                        report_id = %report.id,
                        endpoints = summary.total_endpoints,
                        risks = summary.total_risks,
                        high = summary.high_risks,
                        medium = summary.medium_risks,
                        low = summary.low_risks,
                        degrading = summary.degrading_endpoints,
                        dependencies = summary.total_dependencies,
                        cyclic = summary.cyclic_nodes,
                        "Generated scheduled health report"
                    );
                    Ok(())
                },
            )?;
        }

        Ok(())
    }
}
