//! Ingestion worker pool configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Number of ingestion worker threads
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Bounded queue length; a full queue runs the task on the caller
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ExecutorConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.worker_threads != default_worker_threads() {
            self.worker_threads = other.worker_threads;
        }
        if other.queue_capacity != default_queue_capacity() {
            self.queue_capacity = other.queue_capacity;
        }
        self
    }
}
