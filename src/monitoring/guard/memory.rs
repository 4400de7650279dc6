//! Memory probes
//!
//! The system probe reads the resident memory of the current process through
//! sysinfo when the `metrics` feature is enabled; without it the probe reports
//! nothing and the guard never degrades.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::monitoring::resources::process;

/// Source of memory readings, in bytes
pub trait MemoryProbe: Send + Sync + Debug {
    fn used_bytes(&self) -> u64;
    fn total_bytes(&self) -> u64;
}

/// Resident memory of this process, with host RAM as the total
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn used_bytes(&self) -> u64 {
        process::current_process_memory().unwrap_or(0)
    }

    fn total_bytes(&self) -> u64 {
        process::host_total_memory()
    }
}

/// Probe returning values set by the embedder
#[derive(Debug)]
pub struct FixedMemoryProbe {
    used: AtomicU64,
    total: AtomicU64,
}

impl FixedMemoryProbe {
    pub fn new(used: u64, total: u64) -> Self {
        Self {
            used: AtomicU64::new(used),
            total: AtomicU64::new(total),
        }
    }

    pub fn set_used(&self, used: u64) {
        self.used.store(used, Ordering::Relaxed);
    }
}

impl MemoryProbe for FixedMemoryProbe {
    fn used_bytes(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    fn total_bytes(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
