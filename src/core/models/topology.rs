//! Topology graph values

use super::dependency::DependencyType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the single application root node
pub const APPLICATION_NODE_ID: &str = "application";

/// Node kind in the dependency topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Application,
    Database,
    Redis,
    HttpService,
    MessageQueue,
}

impl NodeType {
    /// Node type a dependency is drawn as
    pub fn from_dependency(dependency_type: DependencyType) -> Self {
        match dependency_type {
            DependencyType::Database => Self::Database,
            DependencyType::Cache => Self::Redis,
            DependencyType::HttpService => Self::HttpService,
            DependencyType::MessageQueue => Self::MessageQueue,
            DependencyType::Unknown => Self::Application,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Database => "database",
            Self::Redis => "redis",
            Self::HttpService => "http_service",
            Self::MessageQueue => "message_queue",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex of the topology graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl TopologyNode {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A directed edge of the topology graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub source: String,
    pub target: String,
    pub call_count: u64,
    /// Milliseconds
    pub average_latency: f64,
}

/// Node as exposed to report consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeView {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub properties: BTreeMap<String, serde_json::Value>,
    pub cyclic: bool,
}

/// Read-only node/edge projection of a topology
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNodeView>,
    pub edges: Vec<TopologyEdge>,
    pub cyclic_node_count: usize,
}
