//! Per-endpoint measurement storage
//!
//! Measurements are kept in memory per endpoint. When an endpoint exceeds its cap the
//! whole in-memory set is appended to a daily JSON file and cleared; files older than
//! the retention window are deleted by [`MetricsStore::cleanup_old_data`].

pub mod persistence;
mod store;


pub use persistence::{corrupt_path_for, file_name_for, parse_file_date, sanitize_endpoint};
pub use store::MetricsStore;
