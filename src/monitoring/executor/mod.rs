//! Execution resources of the engine
//!
//! - `pool`: fixed-size ingestion worker pool with a bounded queue and caller-runs
//!   backpressure
//! - `scheduler`: single-thread scheduler for periodic background tasks

mod pool;
mod scheduler;


pub use pool::{IngestionPool, PoolStats};
pub use scheduler::BackgroundScheduler;
