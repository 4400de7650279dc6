//! Error handling utilities
//!
//! This module provides the engine error type and the unit-of-work isolation helpers
//! that keep a single failing rule or endpoint from aborting a whole batch.

pub mod error;
pub mod recovery;

#[cfg(test)]
mod tests;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::{isolate, isolate_or_default};
