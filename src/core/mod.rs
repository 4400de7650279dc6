//! Core data model of the diagnostics engine

pub mod models;

pub use models::*;
