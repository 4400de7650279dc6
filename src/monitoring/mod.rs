//! Runtime monitoring
//!
//! Ingestion, live endpoint statistics, the resource guard, process resource
//! sampling and the execution resources behind them, tied together by
//! [`DiagnosticsEngine`].

// Public submodules
pub mod executor;
pub mod guard;
pub mod resources;
pub mod statistics;

// Internal submodules
mod background;
mod system;


pub use system::DiagnosticsEngine;
