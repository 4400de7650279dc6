//! Ingestion worker pool

use crate::config::ExecutorConfig;
use crate::utils::error::{DiagnosticsError, Result, isolate};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::{Condvar, Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type Task = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Counters of an [`IngestionPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub workers: usize,
    pub submitted: u64,
    pub completed: u64,
    /// Tasks run on the submitting thread because the queue was full
    pub caller_runs: u64,
    /// Tasks that returned an error or panicked
    pub failed: u64,
    pub pending: u64,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    completed: AtomicU64,
    caller_runs: AtomicU64,
    failed: AtomicU64,
    pending: AtomicU64,
    idle_lock: Mutex<()>,
    idle: Condvar,
}

impl Counters {
    fn run(&self, task: Task) {
        if isolate("ingestion task", task).is_err() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.idle_lock.lock();
            self.idle.notify_all();
        }
    }
}

/// Fixed-size pool of named worker threads fed by a bounded queue.
///
/// When the queue is full the task runs on the caller's thread, so work is never
/// dropped.
#[derive(Debug)]
pub struct IngestionPool {
    sender: RwLock<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
    worker_count: usize,
}

impl IngestionPool {
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        let (sender, receiver) = channel::bounded::<Task>(config.queue_capacity);
        let counters = Arc::new(Counters::default());

        let mut workers = Vec::with_capacity(config.worker_threads);
        for index in 0..config.worker_threads {
            let receiver: Receiver<Task> = receiver.clone();
            let counters = Arc::clone(&counters);
            let handle = thread::Builder::new()
                .name(format!("depscope-worker-{}", index))
                .spawn(move || {
                    for task in receiver.iter() {
                        counters.run(task);
                    }
                    debug!("Worker exiting");
                })
                .map_err(|e| {
                    DiagnosticsError::executor(format!("Failed to spawn worker thread: {}", e))
                })?;
            workers.push(handle);
        }

        info!(
            workers = config.worker_threads,
            queue_capacity = config.queue_capacity,
            "Ingestion pool started"
        );
        Ok(Self {
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
            counters,
            worker_count: config.worker_threads,
        })
    }

    /// Queue a task; runs it inline when the queue is full or the pool is shut down
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        self.counters.pending.fetch_add(1, Ordering::AcqRel);

        let task: Task = Box::new(task);
        let rejected = {
            let sender = self.sender.read();
            match sender.as_ref() {
                Some(sender) => match sender.try_send(task) {
                    Ok(()) => None,
                    Err(TrySendError::Full(task)) => {
                        self.counters.caller_runs.fetch_add(1, Ordering::Relaxed);
                        debug!("Ingestion queue full, running task on caller thread");
                        Some(task)
                    }
                    Err(TrySendError::Disconnected(task)) => Some(task),
                },
                None => Some(task),
            }
        };

        if let Some(task) = rejected {
            self.counters.run(task);
        }
    }

    /// Block until no task is pending or `timeout` elapses; returns whether idle
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.counters.idle_lock.lock();
        while self.counters.pending.load(Ordering::Acquire) > 0 {
            if self
                .counters
                .idle
                .wait_until(&mut guard, deadline)
                .timed_out()
            {
                return self.counters.pending.load(Ordering::Acquire) == 0;
            }
        }
        true
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.worker_count,
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            caller_runs: self.counters.caller_runs.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            pending: self.counters.pending.load(Ordering::Acquire),
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Stop accepting queued work, drain the queue and join the workers
    pub fn shutdown(&self) {
        let Some(sender) = self.sender.write().take() else {
            return;
        };
        drop(sender);

        let workers: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();
        for handle in workers {
            if handle.join().is_err() {
                warn!("Ingestion worker terminated abnormally");
            }
        }
        info!(completed = self.stats().completed, "Ingestion pool shut down");
    }
}

impl Drop for IngestionPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
