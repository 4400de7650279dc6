//! Dependency topology
//!
//! Builds a directed graph rooted at the application node, detects the nodes that
//! take part in cycles and exports the result as a node/edge view, JSON or DOT.

mod builder;
mod export;
mod graph;


pub use builder::{DependencyTopology, TopologyBuilder};
pub use export::{node_color, to_dot};
pub use graph::DependencyGraph;
