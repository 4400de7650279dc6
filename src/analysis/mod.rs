//! Analysis over the collected data
//!
//! Every analyzer works on point-in-time snapshots and never fails a query for
//! lack of data: empty inputs produce empty or default results.

pub mod health;
pub mod ip;
pub mod report;
pub mod trend;

pub use health::{HealthAnalyzer, RiskContext, RiskRule};
pub use ip::IpAnalyzer;
pub use report::{assemble_report, summarize};
pub use trend::TrendAnalyzer;
