//! Utility modules
//!
//! - **error**: error type, result alias and unit-of-work isolation
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;
