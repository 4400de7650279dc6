//! # depscope
//!
//! Runtime diagnostics engine for a running application: per-endpoint request
//! statistics, a dependency topology with cycle detection, rule-based
//! architecture risk analysis and latency trend detection.
//!
//! ## Features
//!
//! - **Non-blocking ingestion**: measurements are handed to a bounded worker pool;
//!   a full queue runs the task on the caller instead of dropping it
//! - **Exact statistics**: QPS, nearest-rank p95/p99 and error accounting per endpoint
//! - **Retention-bounded storage**: in-memory series with overflow to daily files
//! - **Topology**: application/dependency graph, Tarjan cycle detection, DOT and JSON export
//! - **Risk rules**: single points of failure, cycles, slow endpoints, error rates,
//!   excessive dependencies
//! - **Trends**: least-squares latency regression and degradation detection
//! - **Resource guard**: adaptive sampling driven by the process's own memory
//! - **Process sampling**: periodic memory, CPU and thread readings in a bounded history
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depscope::{Config, DiagnosticsEngine};
//! use depscope::core::models::{DependencyType, ExternalDependency, RequestMeasurement};
//!
//! fn main() -> depscope::Result<()> {
//!     let engine = DiagnosticsEngine::new(Config::default())?;
//!     engine.start()?;
//!
//!     engine.register_dependency(
//!         ExternalDependency::new("orders-db", DependencyType::Database).with_critical(true),
//!     )?;
//!     engine.ingest(RequestMeasurement::new("GET /orders", 12_000_000, 200, 1_700_000_000_000, "GET")?);
//!
//!     for risk in engine.analyze_risks() {
//!         println!("{:?} {}: {}", risk.severity, risk.component, risk.description);
//!     }
//!     engine.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod registry;
pub mod storage;
pub mod topology;
pub mod utils;

pub use config::Config;
pub use monitoring::DiagnosticsEngine;
pub use utils::error::{DiagnosticsError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Where and how this binary was built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Short commit hash, `unknown` outside a git checkout
    pub commit: &'static str,
    pub rustc: &'static str,
    /// Unix seconds
    pub built_at: u64,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.version, self.commit, self.rustc)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        commit: option_env!("DEPSCOPE_COMMIT").unwrap_or("unknown"),
        rustc: option_env!("DEPSCOPE_RUSTC").unwrap_or("unknown"),
        built_at: option_env!("DEPSCOPE_BUILT_AT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
    }
}
