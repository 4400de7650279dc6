//! Dependency registry
//!
//! Concurrent keyed store of discovered external dependencies and the call links
//! between them.

mod dependency;


pub use dependency::DependencyRegistry;
