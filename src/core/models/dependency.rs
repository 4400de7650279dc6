//! External dependencies discovered in the host application

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of external system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    Database,
    Cache,
    HttpService,
    MessageQueue,
    /// Anything discovery could not classify
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Database => "database",
            Self::Cache => "cache",
            Self::HttpService => "http_service",
            Self::MessageQueue => "message_queue",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A discovered external dependency. Re-registering the same id replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDependency {
    /// Unique identifier
    pub id: String,
    /// Dependency kind
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,
    /// Whether the application cannot work without it
    #[serde(default)]
    pub critical: bool,
    /// Whether a replica or failover exists
    #[serde(default)]
    pub has_redundancy: bool,
    /// Observed number of calls
    #[serde(default)]
    pub call_count: u64,
    /// Connection target, credentials stripped by the discovery side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Free-form attributes
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ExternalDependency {
    pub fn new(id: impl Into<String>, dependency_type: DependencyType) -> Self {
        Self {
            id: id.into(),
            dependency_type,
            critical: false,
            has_redundancy: false,
            call_count: 0,
            connection_string: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_redundancy(mut self, has_redundancy: bool) -> Self {
        self.has_redundancy = has_redundancy;
        self
    }

    pub fn with_call_count(mut self, call_count: u64) -> Self {
        self.call_count = call_count;
        self
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Critical and without a fallback
    pub fn is_single_point_of_failure(&self) -> bool {
        self.critical && !self.has_redundancy
    }
}

/// A directed call relation between two dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub call_count: u64,
    #[serde(default)]
    pub average_latency_ms: f64,
}

impl DependencyLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            call_count: 0,
            average_latency_ms: 0.0,
        }
    }

    pub fn with_calls(mut self, call_count: u64, average_latency_ms: f64) -> Self {
        self.call_count = call_count;
        self.average_latency_ms = average_latency_ms;
        self
    }
}
