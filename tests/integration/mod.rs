//! Integration tests for depscope
//!
//! These tests drive the public API and check real system behavior without
//! mocking.

pub mod config_validation_tests;
pub mod engine_tests;
pub mod error_handling_tests;
pub mod retention_tests;
