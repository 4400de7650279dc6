//! Process resource sampling
//!
//! A fixed-rate task reads the memory, CPU and thread count of the current
//! process and keeps the most recent readings in a bounded history.

pub(crate) mod process;
mod sampler;

#[cfg(test)]
mod tests;

pub use sampler::{FixedResourceReader, ResourceReader, ResourceSampler, SystemResourceReader};
