//! Numeric kernel shared by every metric module.
//!
//! These helpers know nothing about [`MetricValue`](crate::metric::MetricValue);
//! empty input yields `None` where a value is undefined.

use statrs::statistics::Statistics;
use std::cmp::Ordering;

pub fn sum(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, |total, value| total + value)
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted_ascending(values);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Linear-interpolation percentile; `percentile_value` is clamped to [0, 100].
pub fn percentile(values: &[f64], percentile_value: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sorted = sorted_ascending(values);
    let clamped = if percentile_value.is_nan() {
        0.0
    } else {
        percentile_value.clamp(0.0, 100.0)
    };
    let rank = (clamped / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        return Some(sorted[lower_index]);
    }

    let interpolation = rank - lower_index as f64;
    Some(sorted[lower_index] + (sorted[upper_index] - sorted[lower_index]) * interpolation)
}

/// Population standard deviation. Zero for an empty set, never undefined.
pub fn population_standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let deviation = values.iter().population_std_dev();
    if deviation.is_finite() {
        deviation.max(0.0)
    } else {
        0.0
    }
}

pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
