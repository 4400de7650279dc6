//! Regression helpers

use crate::core::models::TrendDirection;

/// Slopes with a smaller magnitude count as flat
pub const STABLE_SLOPE: f64 = 0.01;

/// Slope of `values` regressed against their zero-based index.
///
/// Returns 0 when the slope is undefined (fewer than two points).
pub fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

pub fn direction_for_slope(slope: f64) -> TrendDirection {
    if slope.abs() < STABLE_SLOPE {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Whether the second half is slower than the first by more than `threshold`
/// (a ratio). Only meaningful for a rising slope.
pub(crate) fn is_degrading(values: &[f64], slope: f64, threshold: f64) -> bool {
    if slope <= 0.0 {
        return false;
    }

    let (historical, recent) = values.split_at(values.len() / 2);
    let historical_mean = mean(historical);
    if historical_mean <= 0.0 {
        return false;
    }
    (mean(recent) - historical_mean) / historical_mean > threshold
}
