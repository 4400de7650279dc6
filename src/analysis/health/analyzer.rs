//! Health analyzer

use super::rules::{RiskContext, RiskRule, default_rules};
use crate::config::AnalysisConfig;
use crate::core::models::ArchitectureRisk;
use crate::monitoring::statistics::StatisticsAggregator;
use crate::registry::DependencyRegistry;
use crate::topology::TopologyBuilder;
use crate::utils::error::isolate;
use std::sync::Arc;
use tracing::info;

/// Runs the risk rules against fresh snapshots
pub struct HealthAnalyzer {
    registry: Arc<DependencyRegistry>,
    aggregator: Arc<StatisticsAggregator>,
    topology_builder: TopologyBuilder,
    thresholds: AnalysisConfig,
    rules: Vec<Box<dyn RiskRule>>,
}

impl std::fmt::Debug for HealthAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthAnalyzer")
            .field("thresholds", &self.thresholds)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl HealthAnalyzer {
    pub fn new(
        registry: Arc<DependencyRegistry>,
        aggregator: Arc<StatisticsAggregator>,
        thresholds: AnalysisConfig,
    ) -> Self {
        let topology_builder = TopologyBuilder::new(Arc::clone(&registry));
        Self {
            registry,
            aggregator,
            topology_builder,
            thresholds,
            rules: default_rules(),
        }
    }

    /// Replace the rule set
    pub fn with_rules(mut self, rules: Vec<Box<dyn RiskRule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Snapshot of registry, statistics and topology
    pub fn context(&self) -> RiskContext {
        RiskContext {
            dependencies: self.registry.snapshot(),
            statistics: self.aggregator.get_all_statistics(),
            topology: self.topology_builder.build_topology(),
            thresholds: self.thresholds.clone(),
        }
    }

    /// Evaluate every rule. A failing rule is logged and contributes nothing.
    pub fn analyze_risks(&self) -> Vec<ArchitectureRisk> {
        let context = self.context();
        self.analyze_context(&context)
    }

    pub fn analyze_context(&self, context: &RiskContext) -> Vec<ArchitectureRisk> {
        let mut risks = Vec::new();
        for rule in &self.rules {
            if let Ok(found) = isolate(rule.name(), || rule.evaluate(context)) {
                risks.extend(found);
            }
        }

        info!("Health analysis complete: {} risks identified", risks.len());
        risks
    }
}
