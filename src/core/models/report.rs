//! Health report values

use super::risk::{ArchitectureRisk, Severity};
use super::statistics::EndpointStatistics;
use super::topology::GraphView;
use super::trend::TrendAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Headline numbers of a [`HealthReport`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_endpoints: usize,
    pub total_risks: usize,
    pub high_risks: usize,
    pub medium_risks: usize,
    pub low_risks: usize,
    pub degrading_endpoints: usize,
    /// Topology nodes other than the application root
    pub total_dependencies: usize,
    pub cyclic_nodes: usize,
}

/// Point-in-time diagnostics report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub topology: GraphView,
    pub risks: Vec<ArchitectureRisk>,
    pub statistics: BTreeMap<String, EndpointStatistics>,
    pub trends: BTreeMap<String, TrendAnalysis>,
    pub summary: ReportSummary,
}

impl HealthReport {
    /// Endpoints whose latency is degrading
    pub fn degrading_endpoints(&self) -> Vec<&str> {
        self.trends
            .values()
            .filter(|t| t.degrading)
            .map(|t| t.endpoint_id.as_str())
            .collect()
    }

    pub fn high_severity_risks(&self) -> Vec<&ArchitectureRisk> {
        self.risks
            .iter()
            .filter(|r| r.severity == Severity::High)
            .collect()
    }

    pub fn is_healthy(&self) -> bool {
        self.summary.high_risks == 0 && self.summary.degrading_endpoints == 0
    }
}
