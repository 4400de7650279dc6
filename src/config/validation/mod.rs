//! Configuration validation
//!
//! - `trait_def`: core Validate trait definition
//! - `validators`: per-section validators
//! - `tests`: test suite for all validators

mod trait_def;
mod validators;

pub use trait_def::Validate;
