//! The risk rules
//!
//! Rules are stateless. Each one reads a [`RiskContext`] snapshot and returns its
//! findings; recommendation lists are fixed per rule.

use crate::config::AnalysisConfig;
use crate::core::models::{
    ArchitectureRisk, EndpointStatistics, ExternalDependency, RiskType, Severity,
};
use crate::topology::DependencyTopology;
use crate::utils::error::Result;
use std::collections::BTreeMap;

const SPOF_RECOMMENDATIONS: &[&str] = &[
    "Configure primary/replica replication or a cluster",
    "Implement a failover mechanism",
    "Add circuit breaker protection",
];

const CYCLE_RECOMMENDATIONS: &[&str] = &[
    "Refactor to remove the circular dependency",
    "Decouple components through interfaces and dependency injection",
    "Consider an event-driven architecture",
];

const SLOW_ENDPOINT_RECOMMENDATIONS: &[&str] = &[
    "Optimize database queries",
    "Add a caching layer",
    "Consider asynchronous processing",
    "Check for N+1 query patterns",
];

const ERROR_RATE_RECOMMENDATIONS: &[&str] = &[
    "Inspect error logs to locate the root cause",
    "Add input validation",
    "Improve error handling",
    "Consider adding a retry mechanism",
];

const EXCESSIVE_DEPENDENCY_RECOMMENDATIONS: &[&str] = &[
    "Cache results to reduce call volume",
    "Batch requests",
    "Check for unnecessary repeated calls",
];

/// Snapshot the rules are evaluated against
#[derive(Debug, Clone)]
pub struct RiskContext {
    pub dependencies: Vec<ExternalDependency>,
    pub statistics: BTreeMap<String, EndpointStatistics>,
    pub topology: DependencyTopology,
    pub thresholds: AnalysisConfig,
}

/// A single, independent risk rule
pub trait RiskRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>>;
}

/// The five built-in rules, in evaluation order
pub fn default_rules() -> Vec<Box<dyn RiskRule>> {
    vec![
        Box::new(SinglePointOfFailureRule),
        Box::new(CircularDependencyRule),
        Box::new(SlowEndpointRule),
        Box::new(HighErrorRateRule),
        Box::new(ExcessiveDependencyRule),
    ]
}

/// Critical dependencies without redundancy
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointOfFailureRule;

impl RiskRule for SinglePointOfFailureRule {
    fn name(&self) -> &'static str {
        "single point of failure"
    }

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>> {
        Ok(context
            .dependencies
            .iter()
            .filter(|d| d.is_single_point_of_failure())
            .map(|d| {
                ArchitectureRisk::new(
                    RiskType::SinglePointOfFailure,
                    Severity::High,
                    d.id.clone(),
                    format!(
                        "Critical dependency '{}' has no redundancy and is a single point of failure",
                        d.id
                    ),
                )
                .with_recommendations(SPOF_RECOMMENDATIONS)
            })
            .collect())
    }
}

/// One finding naming every node on a cycle
#[derive(Debug, Clone, Copy, Default)]
pub struct CircularDependencyRule;

impl RiskRule for CircularDependencyRule {
    fn name(&self) -> &'static str {
        "circular dependency"
    }

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>> {
        let cyclic = context.topology.cyclic_nodes();
        if cyclic.is_empty() {
            return Ok(Vec::new());
        }

        let components = cyclic.iter().cloned().collect::<Vec<_>>().join(", ");
        let description = format!(
            "Detected {} components in circular dependencies: {}",
            cyclic.len(),
            components
        );
        Ok(vec![
            ArchitectureRisk::new(
                RiskType::CircularDependency,
                Severity::High,
                components,
                description,
            )
            .with_recommendations(CYCLE_RECOMMENDATIONS),
        ])
    }
}

/// Endpoints slower than the configured threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct SlowEndpointRule;

impl SlowEndpointRule {
    pub fn severity(avg_ms: f64, threshold_ms: f64) -> Severity {
        if avg_ms > threshold_ms * 3.0 {
            Severity::High
        } else if avg_ms > threshold_ms * 2.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl RiskRule for SlowEndpointRule {
    fn name(&self) -> &'static str {
        "slow endpoint"
    }

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>> {
        let threshold = context.thresholds.slow_endpoint_threshold_ms as f64;
        Ok(context
            .statistics
            .values()
            .filter(|s| s.avg_response_time_ms > threshold)
            .map(|s| {
                ArchitectureRisk::new(
                    RiskType::PerformanceBottleneck,
                    Self::severity(s.avg_response_time_ms, threshold),
                    s.endpoint_id.clone(),
                    format!(
                        "Endpoint '{}' averages {:.2} ms, above the {} ms threshold",
                        s.endpoint_id,
                        s.avg_response_time_ms,
                        context.thresholds.slow_endpoint_threshold_ms
                    ),
                )
                .with_recommendations(SLOW_ENDPOINT_RECOMMENDATIONS)
            })
            .collect())
    }
}

/// Endpoints failing more often than the configured rate
#[derive(Debug, Clone, Copy, Default)]
pub struct HighErrorRateRule;

impl HighErrorRateRule {
    pub fn severity(error_rate: f64) -> Severity {
        if error_rate > 0.20 {
            Severity::High
        } else if error_rate > 0.10 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl RiskRule for HighErrorRateRule {
    fn name(&self) -> &'static str {
        "high error rate"
    }

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>> {
        let threshold = context.thresholds.high_error_rate_threshold;
        Ok(context
            .statistics
            .values()
            .filter(|s| s.error_rate > threshold)
            .map(|s| {
                ArchitectureRisk::new(
                    RiskType::HighErrorRate,
                    Self::severity(s.error_rate),
                    s.endpoint_id.clone(),
                    format!(
                        "Endpoint '{}' error rate {:.2}% exceeds the {:.2}% threshold",
                        s.endpoint_id,
                        s.error_rate * 100.0,
                        threshold * 100.0
                    ),
                )
                .with_recommendations(ERROR_RATE_RECOMMENDATIONS)
            })
            .collect())
    }
}

/// Dependencies called far more than the rest
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcessiveDependencyRule;

impl ExcessiveDependencyRule {
    /// Mean and population standard deviation of the call counts
    pub fn call_count_stats(dependencies: &[ExternalDependency]) -> (f64, f64) {
        if dependencies.is_empty() {
            return (0.0, 0.0);
        }
        let n = dependencies.len() as f64;
        let mean = dependencies.iter().map(|d| d.call_count as f64).sum::<f64>() / n;
        let variance = dependencies
            .iter()
            .map(|d| (d.call_count as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, variance.sqrt())
    }
}

impl RiskRule for ExcessiveDependencyRule {
    fn name(&self) -> &'static str {
        "excessive dependency"
    }

    fn evaluate(&self, context: &RiskContext) -> Result<Vec<ArchitectureRisk>> {
        if context.dependencies.len() < 2 {
            return Ok(Vec::new());
        }

        let (mean, std_dev) = Self::call_count_stats(&context.dependencies);
        if std_dev <= 0.0 {
            return Ok(Vec::new());
        }
        let threshold = mean + context.thresholds.excessive_dependency_sigma * std_dev;

        Ok(context
            .dependencies
            .iter()
            .filter(|d| d.call_count as f64 > threshold)
            .map(|d| {
                ArchitectureRisk::new(
                    RiskType::ExcessiveDependency,
                    Severity::Medium,
                    d.id.clone(),
                    format!(
                        "Dependency '{}' call count ({}) is abnormally high (threshold {:.1})",
                        d.id, d.call_count, threshold
                    ),
                )
                .with_recommendations(EXCESSIVE_DEPENDENCY_RECOMMENDATIONS)
            })
            .collect())
    }
}
