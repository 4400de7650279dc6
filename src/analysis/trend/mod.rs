//! Latency trend analysis
//!
//! Ordinary least-squares regression of response time against the measurement
//! index, plus a half-over-half comparison for degradation.

mod analyzer;
pub(crate) mod regression;

#[cfg(test)]
mod tests;

pub use analyzer::TrendAnalyzer;
pub use regression::{direction_for_slope, least_squares_slope};
