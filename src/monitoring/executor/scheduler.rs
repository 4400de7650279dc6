//! Background task scheduler
//!
//! A dedicated thread drives a current-thread Tokio runtime. Tasks are plain
//! synchronous closures and run one at a time on that thread.

use crate::utils::error::{DiagnosticsError, Result, isolate};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::runtime::{Builder, Handle};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const SCHEDULER_THREAD_NAME: &str = "depscope-scheduler";

/// Single-thread scheduler for periodic and delayed tasks
#[derive(Debug)]
pub struct BackgroundScheduler {
    handle: Handle,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    thread: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
    scheduled: Arc<AtomicUsize>,
}

impl BackgroundScheduler {
    pub fn new() -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (handle_tx, handle_rx) = crossbeam::channel::bounded::<Result<Handle>>(1);

        let mut thread_rx = shutdown_rx.clone();
        let thread = thread::Builder::new()
            .name(SCHEDULER_THREAD_NAME.to_string())
            .spawn(move || {
                let runtime = match Builder::new_current_thread().enable_all().build() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = handle_tx.send(Err(DiagnosticsError::executor(format!(
                            "Failed to build scheduler runtime: {}",
                            e
                        ))));
                        return;
                    }
                };
                let _ = handle_tx.send(Ok(runtime.handle().clone()));

                runtime.block_on(async move {
                    while !*thread_rx.borrow_and_update() {
                        if thread_rx.changed().await.is_err() {
                            break;
                        }
                    }
                });
                debug!("Scheduler runtime stopped");
            })
            .map_err(|e| {
                DiagnosticsError::executor(format!("Failed to spawn scheduler thread: {}", e))
            })?;

        let handle = handle_rx
            .recv()
            .map_err(|_| DiagnosticsError::executor("Scheduler thread exited during startup"))??;

        info!("Background scheduler started");
        Ok(Self {
            handle,
            shutdown_tx,
            shutdown_rx,
            thread: Mutex::new(Some(thread)),
            stopped: AtomicBool::new(false),
            scheduled: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn ensure_running(&self, name: &str) -> Result<()> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(DiagnosticsError::executor(format!(
                "Cannot schedule '{}': scheduler is shut down",
                name
            )));
        }
        Ok(())
    }

    /// Run `task` after `initial_delay`, then every `period` until shutdown
    pub fn schedule_at_fixed_rate<F>(
        &self,
        name: &str,
        initial_delay: Duration,
        period: Duration,
        task: F,
    ) -> Result<()>
    where
        F: Fn() -> Result<()> + Send + 'static,
    {
        self.ensure_running(name)?;
        if period.is_zero() {
            return Err(DiagnosticsError::executor(format!(
                "Period of '{}' must be positive",
                name
            )));
        }

        debug!(task = %name, ?initial_delay, ?period, "Scheduling periodic task");
        let name = name.to_string();
        let mut shutdown = self.shutdown_rx.clone();
        let scheduled = Arc::clone(&self.scheduled);
        scheduled.fetch_add(1, Ordering::Relaxed);

        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(initial_delay) => {}
                _ = shutdown.changed() => {
                    scheduled.fetch_sub(1, Ordering::Relaxed);
                    return;
                }
            }

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let _ = isolate(&name, &task);
                    }
                    _ = shutdown.changed() => break,
                }
            }
            scheduled.fetch_sub(1, Ordering::Relaxed);
            debug!(task = %name, "Periodic task stopped");
        });

        Ok(())
    }

    /// Run `task` once after `delay`, unless the scheduler shuts down first
    pub fn schedule_once<F>(&self, name: &str, delay: Duration, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.ensure_running(name)?;

        let name = name.to_string();
        let mut shutdown = self.shutdown_rx.clone();
        let scheduled = Arc::clone(&self.scheduled);
        scheduled.fetch_add(1, Ordering::Relaxed);

        self.handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let _ = isolate(&name, task);
                }
                _ = shutdown.changed() => {}
            }
            scheduled.fetch_sub(1, Ordering::Relaxed);
        });
        Ok(())
    }

    /// Tasks that have not finished yet
    pub fn active_tasks(&self) -> usize {
        self.scheduled.load(Ordering::Relaxed)
    }

    pub fn is_shutdown(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Signal every task to stop and join the scheduler thread
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.shutdown_tx.send(true);

        if let Some(thread) = self.thread.lock().take() {
            if thread.join().is_err() {
                warn!("Scheduler thread terminated abnormally");
            }
        }
        info!("Background scheduler shut down");
    }
}

impl Drop for BackgroundScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
