//! Common test utilities for depscope
//!
//! - Engine fixtures with an isolated storage directory and a fixed memory probe
//! - Measurement and dependency factories
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures::{MeasurementFactory, TestEngine};
//!
//! #[test]
//! fn my_test() {
//!     let engine = TestEngine::new();
//!     engine.ingest(MeasurementFactory::ok("GET /a", 10, 0));
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{DependencyFactory, MeasurementFactory, TestEngine};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
