//! Topology construction from the dependency registry

use super::export::to_dot;
use super::graph::DependencyGraph;
use crate::core::models::{
    APPLICATION_NODE_ID, ExternalDependency, GraphView, NodeType, TopologyEdge, TopologyNode,
};
use crate::registry::DependencyRegistry;
use crate::utils::error::{Result, isolate};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A built topology: the graph and the nodes on cycles
#[derive(Debug, Clone, Default)]
pub struct DependencyTopology {
    graph: DependencyGraph,
    cyclic_nodes: BTreeSet<String>,
}

impl DependencyTopology {
    pub fn new(graph: DependencyGraph) -> Self {
        let cyclic_nodes = graph.find_cyclic_nodes();
        Self {
            graph,
            cyclic_nodes,
        }
    }

    /// No nodes, no cycles
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn cyclic_nodes(&self) -> &BTreeSet<String> {
        &self.cyclic_nodes
    }

    pub fn has_cycles(&self) -> bool {
        !self.cyclic_nodes.is_empty()
    }

    pub fn is_cyclic(&self, id: &str) -> bool {
        self.cyclic_nodes.contains(id)
    }

    /// Nodes other than the application root
    pub fn dependency_count(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    pub fn to_view(&self) -> GraphView {
        self.graph.to_view(&self.cyclic_nodes)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_view())?)
    }

    pub fn to_dot(&self) -> String {
        to_dot(&self.graph, &self.cyclic_nodes)
    }
}

/// Builds [`DependencyTopology`] snapshots from the registry
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    registry: Arc<DependencyRegistry>,
}

impl TopologyBuilder {
    pub fn new(registry: Arc<DependencyRegistry>) -> Self {
        Self { registry }
    }

    /// Build the current topology; a failed build yields an empty topology
    pub fn build_topology(&self) -> DependencyTopology {
        match isolate("topology build", || self.try_build()) {
            Ok(topology) => topology,
            Err(e) => {
                warn!("Returning empty topology: {}", e);
                DependencyTopology::empty()
            }
        }
    }

    fn try_build(&self) -> Result<DependencyTopology> {
        let mut graph = DependencyGraph::new();
        graph.add_node(
            TopologyNode::new(APPLICATION_NODE_ID, NodeType::Application)
                .with_property("name", json!("Application")),
        )?;

        for dependency in self.registry.snapshot() {
            if dependency.id == APPLICATION_NODE_ID {
                warn!("Dependency id collides with the application node, skipping");
                continue;
            }
            let call_count = dependency.call_count;
            let id = dependency.id.clone();
            graph.add_node(node_from_dependency(dependency))?;
            graph.add_edge(TopologyEdge {
                source: APPLICATION_NODE_ID.to_string(),
                target: id,
                call_count,
                average_latency: 0.0,
            })?;
        }

        // Root edges come from the registry only
        for link in self.registry.links() {
            if link.source == APPLICATION_NODE_ID {
                debug!(target = %link.target, "Skipping dependency link from the application node");
                continue;
            }
            let edge = TopologyEdge {
                source: link.source.clone(),
                target: link.target.clone(),
                call_count: link.call_count,
                average_latency: link.average_latency_ms,
            };
            if let Err(e) = graph.add_edge(edge) {
                debug!(
                    source = %link.source,
                    target = %link.target,
                    "Skipping dependency link: {}",
                    e
                );
            }
        }

        let topology = DependencyTopology::new(graph);
        if topology.has_cycles() {
            warn!(
                cyclic = ?topology.cyclic_nodes(),
                "Detected {} nodes involved in circular dependencies",
                topology.cyclic_nodes().len()
            );
        }
        info!(
            nodes = topology.graph().node_count(),
            edges = topology.graph().edge_count(),
            cyclic = topology.cyclic_nodes().len(),
            "Built dependency topology"
        );
        Ok(topology)
    }
}

fn node_from_dependency(dependency: ExternalDependency) -> TopologyNode {
    let mut node = TopologyNode::new(
        dependency.id,
        NodeType::from_dependency(dependency.dependency_type),
    );
    for (key, value) in dependency.metadata {
        node.properties.insert(key, json!(value));
    }
    node.properties
        .insert("critical".to_string(), json!(dependency.critical));
    node.properties
        .insert("hasRedundancy".to_string(), json!(dependency.has_redundancy));
    node.properties
        .insert("callCount".to_string(), json!(dependency.call_count));
    if let Some(connection) = dependency.connection_string {
        node.properties
            .insert("connectionString".to_string(), json!(connection));
    }
    node
}
