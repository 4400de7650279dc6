//! Health report assembly

use crate::core::models::{
    ArchitectureRisk, EndpointStatistics, HealthReport, ReportSummary, Severity, TrendAnalysis,
};
use crate::topology::DependencyTopology;
use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Headline numbers over the report inputs
pub fn summarize(
    topology: &DependencyTopology,
    risks: &[ArchitectureRisk],
    statistics: &BTreeMap<String, EndpointStatistics>,
    trends: &BTreeMap<String, TrendAnalysis>,
) -> ReportSummary {
    let count = |severity: Severity| risks.iter().filter(|r| r.severity == severity).count();

    ReportSummary {
        total_endpoints: statistics.len(),
        total_risks: risks.len(),
        high_risks: count(Severity::High),
        medium_risks: count(Severity::Medium),
        low_risks: count(Severity::Low),
        degrading_endpoints: trends.values().filter(|t| t.degrading).count(),
        total_dependencies: topology.dependency_count(),
        cyclic_nodes: topology.cyclic_nodes().len(),
    }
}

/// Combine the analysis outputs into a [`HealthReport`]. Risks are ordered by
/// severity, most severe first.
pub fn assemble_report(
    topology: &DependencyTopology,
    mut risks: Vec<ArchitectureRisk>,
    statistics: BTreeMap<String, EndpointStatistics>,
    trends: BTreeMap<String, TrendAnalysis>,
) -> HealthReport {
    risks.sort_by_key(|r| r.severity);
    let summary = summarize(topology, &risks, &statistics, &trends);

    HealthReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        topology: topology.to_view(),
        risks,
        statistics,
        trends,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{RiskType, TrendDirection};

    fn risk(severity: Severity) -> ArchitectureRisk {
        ArchitectureRisk::new(RiskType::HighErrorRate, severity, "GET /a", "failing")
    }

    #[test]
    fn test_report_summary() {
        let risks = vec![risk(Severity::Low), risk(Severity::High), risk(Severity::Medium)];
        let mut trends = BTreeMap::new();
        trends.insert(
            "GET /a".to_string(),
            TrendAnalysis {
                endpoint_id: "GET /a".to_string(),
                direction: TrendDirection::Rising,
                change_rate: 2.5,
                degrading: true,
            },
        );
        trends.insert("GET /b".to_string(), TrendAnalysis::stable("GET /b"));
        let mut statistics = BTreeMap::new();
        statistics.insert("GET /a".to_string(), EndpointStatistics::new("GET /a"));

        let report = assemble_report(&DependencyTopology::empty(), risks, statistics, trends);

        assert_eq!(report.summary.total_risks, 3);
        assert_eq!(report.summary.high_risks, 1);
        assert_eq!(report.summary.medium_risks, 1);
        assert_eq!(report.summary.low_risks, 1);
        assert_eq!(report.summary.degrading_endpoints, 1);
        assert_eq!(report.summary.total_endpoints, 1);
        assert_eq!(report.risks[0].severity, Severity::High);
        assert_eq!(report.risks[2].severity, Severity::Low);
        assert_eq!(report.degrading_endpoints(), vec!["GET /a"]);
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_empty_report_is_healthy() {
        let report = assemble_report(
            &DependencyTopology::empty(),
            Vec::new(),
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(report.is_healthy());
        assert_eq!(report.summary, ReportSummary::default());
        assert!(report.topology.nodes.is_empty());
    }
}
