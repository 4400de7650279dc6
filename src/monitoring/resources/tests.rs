//! Tests for process resource sampling

#![cfg(test)]

use super::*;
use crate::core::models::ResourceSample;
use std::sync::Arc;

fn sample_at(timestamp: i64, memory_mb: u64) -> ResourceSample {
    ResourceSample {
        timestamp,
        memory_bytes: memory_mb * 1024 * 1024,
        virtual_memory_bytes: memory_mb * 4 * 1024 * 1024,
        cpu_usage: 12.5,
        thread_count: Some(8),
    }
}

fn fixed_sampler(max_samples: usize) -> (ResourceSampler, Arc<FixedResourceReader>) {
    let reader = Arc::new(FixedResourceReader::new(Some(sample_at(0, 64))));
    let sampler = ResourceSampler::with_reader(max_samples, reader.clone());
    (sampler, reader)
}

#[test]
fn test_sample_appends_to_history() {
    let (sampler, _) = fixed_sampler(10);
    assert!(sampler.is_empty());
    assert_eq!(sampler.latest(), None);

    let taken = sampler.sample().unwrap();
    assert_eq!(taken.memory_bytes, 64 * 1024 * 1024);
    assert_eq!(sampler.len(), 1);
    assert_eq!(sampler.latest(), Some(taken));
}

#[test]
fn test_history_keeps_most_recent_samples() {
    let (sampler, reader) = fixed_sampler(3);
    for ts in 1..=5 {
        reader.set(Some(sample_at(ts, ts as u64)));
        sampler.sample();
    }

    let timestamps: Vec<i64> = sampler.samples().iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, vec![3, 4, 5]);
    assert_eq!(sampler.latest().unwrap().timestamp, 5);
    assert_eq!(sampler.max_samples(), 3);
}

#[test]
fn test_missing_reading_leaves_history_unchanged() {
    let (sampler, reader) = fixed_sampler(3);
    sampler.sample();
    reader.set(None);

    assert_eq!(sampler.sample(), None);
    assert_eq!(sampler.len(), 1);
}

#[test]
fn test_samples_between_is_inclusive() {
    let (sampler, reader) = fixed_sampler(10);
    for ts in [100, 200, 300, 400] {
        reader.set(Some(sample_at(ts, 1)));
        sampler.sample();
    }

    let window: Vec<i64> = sampler
        .samples_between(200, 300)
        .iter()
        .map(|s| s.timestamp)
        .collect();
    assert_eq!(window, vec![200, 300]);
    assert!(sampler.samples_between(500, 600).is_empty());

    sampler.clear();
    assert!(sampler.is_empty());
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let (sampler, _) = fixed_sampler(0);
    assert!(sampler.sample().is_some());
    assert!(sampler.is_empty());
}

#[cfg(feature = "metrics")]
#[test]
fn test_system_reader_reads_current_process() {
    let sampler = ResourceSampler::new(4);
    let sample = sampler.sample().unwrap();

    assert!(sample.memory_bytes > 0);
    assert!(sample.virtual_memory_bytes >= sample.memory_bytes);
    assert!(sample.cpu_usage >= 0.0);
    if cfg!(target_os = "linux") {
        assert!(sample.thread_count.unwrap_or(0) >= 1);
    }
    assert_eq!(sampler.len(), 1);
}
