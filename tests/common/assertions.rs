//! Custom test assertions
//!
//! Domain-specific assertions for depscope values.

use depscope::core::models::{ArchitectureRisk, EndpointStatistics, RiskType, Severity};

/// Assertions for EndpointStatistics
pub trait StatisticsAssertions {
    /// Assert the counters agree with each other
    fn assert_consistent(&self);
}

impl StatisticsAssertions for EndpointStatistics {
    fn assert_consistent(&self) {
        assert!(
            self.error_count <= self.total_requests,
            "error_count {} exceeds total_requests {}",
            self.error_count,
            self.total_requests
        );
        let expected = if self.total_requests == 0 {
            0.0
        } else {
            self.error_count as f64 / self.total_requests as f64
        };
        assert!(
            (self.error_rate - expected).abs() < 1e-9,
            "error_rate {} != {}",
            self.error_rate,
            expected
        );
        assert!(
            self.p99_ms >= self.p95_ms,
            "p99 {} below p95 {}",
            self.p99_ms,
            self.p95_ms
        );
        assert!(self.recent_errors.len() <= 100);
    }
}

/// Find the risk of `risk_type` for `component`, panicking when absent
pub fn find_risk<'a>(
    risks: &'a [ArchitectureRisk],
    risk_type: RiskType,
    component: &str,
) -> &'a ArchitectureRisk {
    risks
        .iter()
        .find(|r| r.risk_type == risk_type && r.component == component)
        .unwrap_or_else(|| panic!("No {:?} risk for '{}' in {:#?}", risk_type, component, risks))
}

/// Assert the risk list contains `risk_type` for `component` with `severity`
pub fn assert_risk(
    risks: &[ArchitectureRisk],
    risk_type: RiskType,
    component: &str,
    severity: Severity,
) {
    let risk = find_risk(risks, risk_type, component);
    assert_eq!(
        risk.severity, severity,
        "Unexpected severity for {:?} on '{}'",
        risk_type, component
    );
    assert!(!risk.recommendations.is_empty());
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)",
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}
