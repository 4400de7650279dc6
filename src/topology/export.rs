//! Graphviz export

use super::graph::DependencyGraph;
use crate::core::models::NodeType;
use std::collections::BTreeSet;
use std::fmt::Write;

const CYCLIC_FILL: &str = "lightcoral";

/// Fill colour of a node type
pub fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Application => "lightblue",
        NodeType::Database => "lightgreen",
        NodeType::Redis => "lightyellow",
        NodeType::HttpService => "lightpink",
        NodeType::MessageQueue => "lavender",
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render the graph in DOT format, highlighting cyclic nodes
pub fn to_dot(graph: &DependencyGraph, cyclic_nodes: &BTreeSet<String>) -> String {
    let mut dot = String::new();
    dot.push_str("digraph DependencyTopology {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box, style=rounded];\n\n");

    for node in graph.nodes() {
        let cyclic = cyclic_nodes.contains(&node.id);
        let (fill, style) = if cyclic {
            (CYCLIC_FILL, "filled,bold")
        } else {
            (node_color(node.node_type), "filled")
        };
        let id = escape(&node.id);
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\", style=\"{}\"];",
            id, id, fill, style
        );
    }

    dot.push('\n');

    for edge in graph.edges() {
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [label=\"calls: {}\"];",
            escape(&edge.source),
            escape(&edge.target),
            edge.call_count
        );
    }

    dot.push_str("}\n");
    dot
}
