//! Rule-based architecture risk analysis

mod analyzer;
pub mod rules;


pub use analyzer::HealthAnalyzer;
pub use rules::{
    CircularDependencyRule, ExcessiveDependencyRule, HighErrorRateRule, RiskContext, RiskRule,
    SinglePointOfFailureRule, SlowEndpointRule, default_rules,
};
