//! Unit-of-work isolation
//!
//! Diagnostics must never take down the application being diagnosed. Every batch
//! operation (risk rules, per-endpoint trends, topology builds, pool tasks) runs its
//! units through these helpers so that an error or a panic is logged and contained.

use super::error::{DiagnosticsError, Result};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{error, warn};

/// Run `f` as an isolated unit of work.
///
/// Errors are logged and returned; panics are caught and turned into
/// [`DiagnosticsError::Analysis`].
pub fn isolate<T, F>(unit: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(unit = unit, category = ?e.category(), "Unit of work failed: {}", e);
            Err(e)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(unit = unit, "Unit of work panicked: {}", message);
            Err(DiagnosticsError::analysis(format!(
                "{} panicked: {}",
                unit, message
            )))
        }
    }
}

/// Like [`isolate`], but falls back to `T::default()` on failure.
pub fn isolate_or_default<T, F>(unit: &str, f: F) -> T
where
    T: Default,
    F: FnOnce() -> Result<T>,
{
    isolate(unit, f).unwrap_or_default()
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
