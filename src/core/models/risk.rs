//! Architecture risks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of architecture risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskType {
    SinglePointOfFailure,
    CircularDependency,
    PerformanceBottleneck,
    HighErrorRate,
    ExcessiveDependency,
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SinglePointOfFailure => "single point of failure",
            Self::CircularDependency => "circular dependency",
            Self::PerformanceBottleneck => "performance bottleneck",
            Self::HighErrorRate => "high error rate",
            Self::ExcessiveDependency => "excessive dependency",
        };
        f.write_str(name)
    }
}

/// Risk severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// A rule finding. Recomputed on every analysis, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureRisk {
    #[serde(rename = "type")]
    pub risk_type: RiskType,
    pub severity: Severity,
    /// Affected dependency, endpoint or node set
    pub component: String,
    pub description: String,
    pub recommendations: Vec<String>,
}

impl ArchitectureRisk {
    pub fn new(
        risk_type: RiskType,
        severity: Severity,
        component: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            risk_type,
            severity,
            component: component.into(),
            description: description.into(),
            recommendations: Vec::new(),
        }
    }

    pub fn with_recommendations(mut self, recommendations: &[&str]) -> Self {
        self.recommendations = recommendations.iter().map(|r| r.to_string()).collect();
        self
    }
}
