use crate::config::InsightThresholds;
use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use crate::models::AccountPnlCalendarDay;
use crate::stats::{average, median, min_value};
use serde::Serialize;

const MISSING_DAILY_DATA_REASON: &str = "needs daily net PnL data";
const MISSING_DAY_PROFIT_REASON: &str = "needs non-zero average day profit";

/// Shape of the daily P&L distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingExtrasMetrics {
    pub median_day_pnl: MetricValue,
    pub avg_green_day: MetricValue,
    pub avg_red_day: MetricValue,
    pub red_day_percent: MetricValue,
    pub nuke_ratio: MetricValue,
    pub green_red_day_size_ratio: MetricValue,
    pub insight: String,
}

/// Finite net P&L of each calendar day, in input order.
pub fn daily_net_values(days: &[AccountPnlCalendarDay]) -> Vec<f64> {
    days.iter()
        .map(|day| day.net_pnl)
        .filter(|value| value.is_finite())
        .collect()
}

pub fn compute_swing_extras(
    days: &[AccountPnlCalendarDay],
    profit_per_day: f64,
    thresholds: &InsightThresholds,
) -> SwingExtrasMetrics {
    let daily_net = daily_net_values(days);

    if daily_net.is_empty() {
        return SwingExtrasMetrics {
            median_day_pnl: missing_metric(MISSING_DAILY_DATA_REASON),
            avg_green_day: missing_metric(MISSING_DAILY_DATA_REASON),
            avg_red_day: missing_metric(MISSING_DAILY_DATA_REASON),
            red_day_percent: missing_metric(MISSING_DAILY_DATA_REASON),
            nuke_ratio: missing_metric(MISSING_DAY_PROFIT_REASON),
            green_red_day_size_ratio: missing_metric(MISSING_DAILY_DATA_REASON),
            insight: format!("N/A ({MISSING_DAILY_DATA_REASON})"),
        };
    }

    let green_days: Vec<f64> = daily_net.iter().copied().filter(|v| *v > 0.0).collect();
    let red_days: Vec<f64> = daily_net.iter().copied().filter(|v| *v < 0.0).collect();
    let non_flat_days = green_days.len() + red_days.len();

    let median_day = median(&daily_net);
    let avg_green = average(&green_days);
    let avg_red = average(&red_days);
    let worst_day = min_value(&daily_net).unwrap_or(0.0);

    let nuke_ratio = if profit_per_day.abs() <= EPSILON || !profit_per_day.is_finite() {
        missing_metric(MISSING_DAY_PROFIT_REASON)
    } else {
        metric(worst_day.abs() / profit_per_day.abs())
    };

    let green_red_day_size_ratio = match (avg_green, avg_red) {
        (Some(green), Some(red)) if red.abs() > EPSILON => metric(green.abs() / red.abs()),
        _ => missing_metric("needs both green and red day history"),
    };

    let red_day_percent = if non_flat_days == 0 {
        missing_metric("needs green/red day history")
    } else {
        metric((red_days.len() as f64 / non_flat_days as f64) * 100.0)
    };

    let insight = compute_swing_insight(&nuke_ratio, avg_green, avg_red, thresholds);

    SwingExtrasMetrics {
        median_day_pnl: match median_day {
            Some(value) => metric(value),
            None => missing_metric(MISSING_DAILY_DATA_REASON),
        },
        avg_green_day: match avg_green {
            Some(value) => metric(value),
            None => missing_metric("needs at least one green day"),
        },
        avg_red_day: match avg_red {
            Some(value) => metric(value),
            None => missing_metric("needs at least one red day"),
        },
        red_day_percent,
        nuke_ratio,
        green_red_day_size_ratio,
        insight,
    }
}

fn compute_swing_insight(
    nuke_ratio: &MetricValue,
    avg_green_day: Option<f64>,
    avg_red_day: Option<f64>,
    thresholds: &InsightThresholds,
) -> String {
    if let Some(ratio) = nuke_ratio
        .value()
        .filter(|ratio| *ratio >= thresholds.nuke_ratio_warning)
    {
        return format!("One worst day can erase ~{ratio:.1} average days.");
    }
    if let (Some(green), Some(red)) = (avg_green_day, avg_red_day) {
        if red.abs() > green.abs() {
            return "Red days are larger than green days on average.".to_string();
        }
    }
    "Daily swings look controlled relative to average day.".to_string()
}
