//! Data models
//!
//! Value types shared by the storage, statistics, topology and analysis layers.

pub mod dependency;
pub mod ip;
pub mod measurement;
pub mod report;
pub mod resource;
pub mod risk;
pub mod statistics;
pub mod topology;
pub mod trend;

pub use dependency::*;
pub use ip::*;
pub use measurement::*;
pub use report::*;
pub use resource::*;
pub use risk::*;
pub use statistics::*;
pub use topology::*;
pub use trend::*;
