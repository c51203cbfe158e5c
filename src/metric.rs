use serde::Serialize;
use std::fmt;

/// Shared tolerance for "is this effectively zero" checks.
pub const EPSILON: f64 = 1e-9;

const BLANK_REASON_FALLBACK: &str = "needs more data";
const NON_FINITE_REASON: &str = "needs finite input values";

/// A derived metric that is either computed or unavailable for a stated reason.
///
/// Fields are private so the contract holds by construction: a missing value
/// always carries a non-empty reason and a present value never carries one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_reason: Option<String>,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn missing_reason(&self) -> Option<&str> {
        self.missing_reason.as_deref()
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }

    /// Numeric value, or `default` when the metric is unavailable.
    pub fn value_or(&self, default: f64) -> f64 {
        self.value.unwrap_or(default)
    }

    /// Renders the value the way the dashboard shows it: fixed precision, or "N/A".
    pub fn display(&self, precision: usize) -> String {
        match self.value {
            Some(value) => format!("{:.*}", precision, value),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.missing_reason) {
            (Some(value), _) => write!(f, "{}", value),
            (None, Some(reason)) => write!(f, "N/A ({})", reason),
            (None, None) => write!(f, "N/A"),
        }
    }
}

pub fn metric(value: f64) -> MetricValue {
    if !value.is_finite() {
        return missing_metric(NON_FINITE_REASON);
    }
    MetricValue {
        value: Some(value),
        missing_reason: None,
    }
}

pub fn missing_metric<S: Into<String>>(reason: S) -> MetricValue {
    let reason = reason.into();
    let trimmed = reason.trim();
    let missing_reason = if trimmed.is_empty() {
        BLANK_REASON_FALLBACK.to_string()
    } else if trimmed.len() == reason.len() {
        reason
    } else {
        trimmed.to_string()
    };

    MetricValue {
        value: None,
        missing_reason: Some(missing_reason),
    }
}

/// Lifts an optional number into the contract, using `reason` when absent.
pub fn metric_or_missing(value: Option<f64>, reason: &str) -> MetricValue {
    match value {
        Some(value) => metric(value),
        None => missing_metric(reason),
    }
}
