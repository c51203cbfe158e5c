use crate::models::AccountPnlCalendarDay;
use crate::ratios::safe_count;
use crate::stats::{max_value, median};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const MILLISECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, Default)]
pub struct ActivityMetricsInput<'a> {
    pub total_trades: f64,
    pub active_days: f64,
    pub daily_pnl_days: &'a [AccountPnlCalendarDay],
    pub range_start: Option<&'a str>,
    pub range_end: Option<&'a str>,
    pub active_hours: Option<f64>,
}

/// Trading cadence. `None` means the figure cannot be derived from the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityMetrics {
    pub median_trades_per_day: Option<f64>,
    pub max_trades_in_day: Option<f64>,
    pub trades_per_week: Option<f64>,
    pub active_days_per_week: Option<f64>,
    pub trades_per_active_hour: Option<f64>,
    pub range_days: Option<f64>,
}

pub fn compute_activity_metrics(input: &ActivityMetricsInput<'_>) -> ActivityMetrics {
    // Daily points arrive grouped by account trading day.
    let active_daily_trade_counts: Vec<f64> = input
        .daily_pnl_days
        .iter()
        .map(|day| safe_count(day.trade_count as f64))
        .filter(|count| *count > 0.0)
        .collect();

    let median_trades_per_day = median(&active_daily_trade_counts);
    let max_trades_in_day = max_value(&active_daily_trade_counts);

    let range_days = compute_range_days(input.range_start, input.range_end, input.daily_pnl_days);
    let weeks = range_days.map(|days| days / 7.0).filter(|weeks| *weeks > 0.0);
    let total_trades = safe_count(input.total_trades);
    let active_days = safe_count(input.active_days);

    let trades_per_active_hour = input
        .active_hours
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .map(|hours| total_trades / hours);

    ActivityMetrics {
        median_trades_per_day,
        max_trades_in_day,
        trades_per_week: weeks.map(|weeks| total_trades / weeks),
        active_days_per_week: weeks.map(|weeks| active_days / weeks),
        trades_per_active_hour,
        range_days,
    }
}

/// Explicit range wins; otherwise the span of the daily series, inclusive.
pub fn compute_range_days(
    range_start: Option<&str>,
    range_end: Option<&str>,
    daily_pnl_days: &[AccountPnlCalendarDay],
) -> Option<f64> {
    let parsed_start = range_start.and_then(parse_timestamp);
    let parsed_end = range_end.and_then(parse_timestamp);

    if let (Some(start), Some(end)) = (parsed_start, parsed_end) {
        return range_days_from_timestamps(start, end);
    }

    range_days_from_daily_series(daily_pnl_days)
}

fn range_days_from_timestamps(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
    let elapsed_days = (end - start).num_milliseconds() as f64 / MILLISECONDS_PER_DAY;
    if !elapsed_days.is_finite() || elapsed_days < 0.0 {
        return None;
    }
    // Partial days round up, minimum one day.
    Some(elapsed_days.ceil().max(1.0))
}

fn range_days_from_daily_series(daily_pnl_days: &[AccountPnlCalendarDay]) -> Option<f64> {
    let first = daily_pnl_days.iter().map(|day| day.date).min()?;
    let last = daily_pnl_days.iter().map(|day| day.date).max()?;
    let span = (last - first).num_days() as f64;
    Some((span + 1.0).max(1.0))
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
