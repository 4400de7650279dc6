//! Endpoint statistics aggregation
//!
//! QPS, latency percentiles and error accounting, recomputed from the retained
//! measurements of an endpoint whenever a new one arrives.

mod aggregator;
pub(crate) mod bounded;
pub(crate) mod helpers;


pub use aggregator::StatisticsAggregator;
