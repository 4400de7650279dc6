//! Current process readings using the sysinfo crate
//!
//! Without the `metrics` feature every reading is absent.

#[cfg(feature = "metrics")]
use chrono::Utc;
#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::core::models::ResourceSample;

#[cfg(feature = "metrics")]
static SYSTEM: Lazy<parking_lot::Mutex<System>> =
    Lazy::new(|| parking_lot::Mutex::new(System::new()));

#[cfg(feature = "metrics")]
static CURRENT_PID: Lazy<Option<Pid>> = Lazy::new(|| sysinfo::get_current_pid().ok());

/// Resident memory of the current process in bytes
#[cfg(feature = "metrics")]
pub(crate) fn current_process_memory() -> Option<u64> {
    let pid = (*CURRENT_PID)?;
    let mut sys = SYSTEM.lock();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::new().with_memory(),
    );
    sys.process(pid).map(|process| process.memory())
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn current_process_memory() -> Option<u64> {
    None
}

/// Physical memory of the host in bytes
#[cfg(feature = "metrics")]
pub(crate) fn host_total_memory() -> u64 {
    let mut sys = SYSTEM.lock();
    sys.refresh_memory();
    sys.total_memory()
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn host_total_memory() -> u64 {
    0
}

/// Memory, CPU and threads of the current process.
///
/// CPU usage is measured between consecutive calls, so the first sample
/// reports zero.
#[cfg(feature = "metrics")]
pub(crate) fn sample_current_process() -> Option<ResourceSample> {
    let pid = (*CURRENT_PID)?;
    let mut sys = SYSTEM.lock();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::new().with_memory().with_cpu(),
    );
    let process = sys.process(pid)?;
    Some(ResourceSample {
        timestamp: Utc::now().timestamp_millis(),
        memory_bytes: process.memory(),
        virtual_memory_bytes: process.virtual_memory(),
        cpu_usage: process.cpu_usage(),
        thread_count: process.tasks().map(|tasks| tasks.len()),
    })
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn sample_current_process() -> Option<ResourceSample> {
    None
}
