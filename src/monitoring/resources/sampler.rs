//! Bounded history of process resource samples

use crate::core::models::ResourceSample;
use crate::monitoring::statistics::bounded::BoundedPush;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::debug;

use super::process;

/// Source of process resource samples
pub trait ResourceReader: Send + Sync + Debug {
    /// Take a reading, or `None` when the platform exposes nothing
    fn read(&self) -> Option<ResourceSample>;
}

/// Reads the current process through the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResourceReader;

impl ResourceReader for SystemResourceReader {
    fn read(&self) -> Option<ResourceSample> {
        process::sample_current_process()
    }
}

/// Reader returning a sample set by the embedder
#[derive(Debug, Default)]
pub struct FixedResourceReader {
    sample: Mutex<Option<ResourceSample>>,
}

impl FixedResourceReader {
    pub fn new(sample: Option<ResourceSample>) -> Self {
        Self {
            sample: Mutex::new(sample),
        }
    }

    pub fn set(&self, sample: Option<ResourceSample>) {
        *self.sample.lock() = sample;
    }
}

impl ResourceReader for FixedResourceReader {
    fn read(&self) -> Option<ResourceSample> {
        *self.sample.lock()
    }
}

/// Keeps the most recent `max_samples` readings, oldest first
#[derive(Debug)]
pub struct ResourceSampler {
    reader: Arc<dyn ResourceReader>,
    history: Mutex<VecDeque<ResourceSample>>,
    max_samples: usize,
}

impl ResourceSampler {
    pub fn new(max_samples: usize) -> Self {
        Self::with_reader(max_samples, Arc::new(SystemResourceReader))
    }

    pub fn with_reader(max_samples: usize, reader: Arc<dyn ResourceReader>) -> Self {
        Self {
            reader,
            history: Mutex::new(VecDeque::with_capacity(max_samples.min(1024))),
            max_samples,
        }
    }

    /// Take one reading and append it to the history
    pub fn sample(&self) -> Option<ResourceSample> {
        let Some(sample) = self.reader.read() else {
            debug!("No process resource reading available");
            return None;
        };
        self.history.lock().push_bounded(sample, self.max_samples);
        Some(sample)
    }

    pub fn latest(&self) -> Option<ResourceSample> {
        self.history.lock().back().copied()
    }

    pub fn samples(&self) -> Vec<ResourceSample> {
        self.history.lock().iter().copied().collect()
    }

    /// Samples taken within `[start, end]` epoch millis
    pub fn samples_between(&self, start: i64, end: i64) -> Vec<ResourceSample> {
        self.history
            .lock()
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.history.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.lock().is_empty()
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    pub fn clear(&self) {
        self.history.lock().clear();
    }
}
