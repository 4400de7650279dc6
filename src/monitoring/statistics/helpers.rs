//! Helper functions for statistics calculations

use super::bounded::BoundedPush;
use crate::core::models::{EndpointStatistics, ErrorDetail, MAX_RECENT_ERRORS, RequestMeasurement};
use std::collections::{BTreeMap, VecDeque};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Requests per second over the observed span.
///
/// A span shorter than one whole second counts as one second.
pub(crate) fn calculate_qps(count: usize, min_timestamp: i64, max_timestamp: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let seconds = max_timestamp.saturating_sub(min_timestamp) / 1000;
    if seconds <= 0 {
        count as f64
    } else {
        count as f64 / seconds as f64
    }
}

/// Mean of nanosecond durations, in milliseconds
pub(crate) fn calculate_average_ms(durations: &[u64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let sum: u128 = durations.iter().map(|&d| u128::from(d)).sum();
    sum as f64 / durations.len() as f64 / NANOS_PER_MILLI
}

/// Nearest-rank percentile of ascending nanosecond durations, in milliseconds.
///
/// `index = ceil(p * n) - 1`, clamped to the slice.
pub(crate) fn nearest_rank_percentile(sorted_durations: &[u64], percentile: f64) -> f64 {
    if sorted_durations.is_empty() {
        return 0.0;
    }
    let n = sorted_durations.len();
    let rank = (percentile * n as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;
    sorted_durations[index] as f64 / NANOS_PER_MILLI
}

pub(crate) fn to_error_detail(measurement: &RequestMeasurement) -> ErrorDetail {
    ErrorDetail {
        timestamp: measurement.timestamp_millis(),
        status_code: measurement.status_code(),
        method: measurement.http_method().to_string(),
        endpoint: measurement.endpoint_id().to_string(),
        duration_ms: measurement.duration_nanos() / 1_000_000,
    }
}

/// The last [`MAX_RECENT_ERRORS`] errors, oldest first
pub(crate) fn recent_error_details<'a, I>(errors: I) -> Vec<ErrorDetail>
where
    I: IntoIterator<Item = &'a RequestMeasurement>,
{
    let mut recent = VecDeque::with_capacity(MAX_RECENT_ERRORS);
    for measurement in errors {
        recent.push_bounded(to_error_detail(measurement), MAX_RECENT_ERRORS);
    }
    recent.into()
}

/// Error count per status code over all errors
pub(crate) fn status_distribution<'a, I>(errors: I) -> BTreeMap<u16, u64>
where
    I: IntoIterator<Item = &'a RequestMeasurement>,
{
    let mut distribution = BTreeMap::new();
    for measurement in errors {
        *distribution.entry(measurement.status_code()).or_insert(0) += 1;
    }
    distribution
}

/// Full recomputation of an endpoint's statistics.
///
/// `measurements` drives the request counters and latencies; `errors` is the
/// authoritative error set used for the recent-error list and distribution.
pub(crate) fn compute_statistics(
    endpoint: &str,
    measurements: &[RequestMeasurement],
    errors: &[RequestMeasurement],
) -> EndpointStatistics {
    let mut stats = EndpointStatistics::new(endpoint);
    if measurements.is_empty() {
        return stats;
    }

    let total = measurements.len();
    let error_count = measurements.iter().filter(|m| m.is_error()).count();

    let mut min_ts = i64::MAX;
    let mut max_ts = i64::MIN;
    for m in measurements {
        min_ts = min_ts.min(m.timestamp_millis());
        max_ts = max_ts.max(m.timestamp_millis());
    }

    let mut durations: Vec<u64> = measurements.iter().map(|m| m.duration_nanos()).collect();
    durations.sort_unstable();

    stats.total_requests = total as u64;
    stats.error_count = error_count as u64;
    stats.qps = calculate_qps(total, min_ts, max_ts);
    stats.avg_response_time_ms = calculate_average_ms(&durations);
    stats.p95_ms = nearest_rank_percentile(&durations, 0.95);
    stats.p99_ms = nearest_rank_percentile(&durations, 0.99);
    stats.error_rate = error_count as f64 / total as f64;
    stats.recent_errors = recent_error_details(errors);
    stats.error_status_distribution = status_distribution(errors);
    stats.source_location = measurements
        .iter()
        .find_map(|m| m.source_location().map(str::to_string));

    stats
}
