//! Process resource samples

use serde::{Deserialize, Serialize};

/// Resource usage of the host process at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// Epoch millis
    pub timestamp: i64,
    /// Resident memory in bytes
    pub memory_bytes: u64,
    /// Virtual memory in bytes
    pub virtual_memory_bytes: u64,
    /// CPU usage in percent since the previous sample; may exceed 100 on
    /// multi-core hosts
    pub cpu_usage: f32,
    /// Number of threads, where the platform exposes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_count: Option<usize>,
}
