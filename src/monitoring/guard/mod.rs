//! Memory-pressure guard
//!
//! Decides per ingestion attempt whether a measurement should be collected, and
//! trims oversized measurement caches.

mod memory;
mod resource;


pub use memory::{FixedMemoryProbe, MemoryProbe, SystemMemoryProbe};
pub use resource::{MeasurementCache, MemoryStatus, ResourceGuard};
