//! Tests for trend analysis

#![cfg(test)]

use super::*;
use crate::config::{AnalysisConfig, StorageConfig};
use crate::core::models::{RequestMeasurement, TrendAnalysis, TrendDirection};
use crate::storage::MetricsStore;
use std::sync::Arc;
use tempfile::TempDir;

const MS: f64 = 1_000_000.0;

fn analyzer() -> (TrendAnalyzer, Arc<MetricsStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(
        MetricsStore::new(&StorageConfig {
            data_dir: dir.path().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        })
        .unwrap(),
    );
    (
        TrendAnalyzer::new(store.clone(), &AnalysisConfig::default()),
        store,
        dir,
    )
}

fn measurement(endpoint: &str, duration_ms: f64, ts: i64) -> RequestMeasurement {
    RequestMeasurement::new(endpoint, (duration_ms * MS) as u64, 200, ts, "GET").unwrap()
}

#[test]
fn test_slope() {
    assert_eq!(least_squares_slope(&[1.0, 2.0, 3.0, 4.0]), 1.0);
    assert_eq!(least_squares_slope(&[5.0, 5.0, 5.0]), 0.0);
    assert_eq!(least_squares_slope(&[42.0]), 0.0);
    assert_eq!(least_squares_slope(&[]), 0.0);
    assert!(least_squares_slope(&[9.0, 6.0, 3.0]) < 0.0);
}

#[test]
fn test_direction_threshold() {
    assert_eq!(direction_for_slope(0.009), TrendDirection::Stable);
    assert_eq!(direction_for_slope(-0.009), TrendDirection::Stable);
    assert_eq!(direction_for_slope(0.02), TrendDirection::Rising);
    assert_eq!(direction_for_slope(-0.5), TrendDirection::Falling);
}

#[test]
fn test_insufficient_data_is_stable() {
    let (analyzer, store, _dir) = analyzer();
    for i in 0..9 {
        store.store(measurement("a", 100.0 + i as f64 * 50.0, i));
    }

    let trend = analyzer.analyze_trend("a");
    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_eq!(trend.change_rate, 0.0);
    assert!(!trend.degrading);
    assert_eq!(analyzer.analyze_trend("missing"), TrendAnalysis::stable("missing"));
}

#[test]
fn test_linear_increase_is_rising() {
    let (analyzer, store, _dir) = analyzer();
    // 100ms to 200ms over 20 points; second half averages ~43% above the first
    for i in 0..20 {
        store.store(measurement("a", 100.0 + i as f64 * 100.0 / 19.0, i * 1000));
    }

    let trend = analyzer.analyze_trend("a");
    assert_eq!(trend.direction, TrendDirection::Rising);
    assert!((trend.change_rate - 100.0 / 19.0).abs() < 1e-3);
    assert!(trend.degrading);
}

#[test]
fn test_small_rise_is_not_degrading() {
    let (analyzer, store, _dir) = analyzer();
    for i in 0..20 {
        store.store(measurement("a", 100.0 + i as f64, i));
    }

    let trend = analyzer.analyze_trend("a");
    assert_eq!(trend.direction, TrendDirection::Rising);
    assert!(!trend.degrading);
}

#[test]
fn test_measurements_sorted_by_timestamp() {
    let (analyzer, store, _dir) = analyzer();
    // inserted newest first; durations fall over time
    for i in (0..12).rev() {
        store.store(measurement("a", 500.0 - i as f64 * 20.0, 1_000 - i));
    }

    let trend = analyzer.analyze_trend("a");
    assert_eq!(trend.direction, TrendDirection::Rising);

    let series = analyzer.get_time_series_data("a", None);
    assert_eq!(series.len(), 12);
    assert!(series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(series[0].response_time_ms, 280.0);
}

#[test]
fn test_falling_trend_never_degrades() {
    let (analyzer, store, _dir) = analyzer();
    for i in 0..15 {
        store.store(measurement("a", 300.0 - i as f64 * 10.0, i));
    }
    let trend = analyzer.analyze_trend("a");
    assert_eq!(trend.direction, TrendDirection::Falling);
    assert!(!trend.degrading);
}

#[test]
fn test_all_trends_and_ranges() {
    let (analyzer, store, _dir) = analyzer();
    for i in 0..10 {
        store.store(measurement("a", 50.0, i * 10));
        store.store(measurement("b", 50.0, i * 10));
    }

    let trends = analyzer.analyze_all_trends();
    assert_eq!(trends.len(), 2);
    assert!(trends.values().all(|t| t.direction == TrendDirection::Stable));

    let window = analyzer.get_time_series_data("a", Some((20, 50)));
    assert_eq!(window.len(), 4);
    assert_eq!(window[0].timestamp, 20);
    assert_eq!(window[3].timestamp, 50);
    assert_eq!(window[0].status_code, 200);
}
