use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use serde::Serialize;

/// Average win divided by the magnitude of the average loss.
pub fn compute_win_loss_ratio(avg_win: f64, avg_loss: f64) -> MetricValue {
    let loss_magnitude = avg_loss.abs();
    if loss_magnitude <= EPSILON {
        return missing_metric("needs a non-zero average loss");
    }
    metric(avg_win / loss_magnitude)
}

pub fn compute_win_duration_ratio(avg_win_minutes: f64, avg_loss_minutes: f64) -> MetricValue {
    if avg_loss_minutes <= EPSILON {
        return missing_metric("needs a non-zero average loss duration");
    }
    metric(avg_win_minutes / avg_loss_minutes)
}

/// Win rate (percent) at which expectancy is zero for the given payoff.
pub fn compute_breakeven_win_rate(avg_win: f64, avg_loss: f64) -> MetricValue {
    let win_magnitude = avg_win.abs();
    let loss_magnitude = avg_loss.abs();
    let denominator = win_magnitude + loss_magnitude;

    if denominator <= EPSILON || loss_magnitude <= EPSILON {
        return missing_metric("needs non-zero average win and average loss");
    }

    metric((loss_magnitude / denominator) * 100.0)
}

pub fn compute_drawdown_percent_of_net_pnl(max_drawdown: f64, net_pnl: f64) -> MetricValue {
    if net_pnl.abs() <= EPSILON {
        return missing_metric("needs non-zero net PnL");
    }
    metric((max_drawdown.abs() / net_pnl.abs()) * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionPercentages {
    pub long_percent: MetricValue,
    pub short_percent: MetricValue,
}

pub fn compute_direction_percentages(long_trades: f64, short_trades: f64) -> DirectionPercentages {
    let long_trades = safe_count(long_trades);
    let short_trades = safe_count(short_trades);
    let total = long_trades + short_trades;

    if total <= EPSILON {
        let missing = missing_metric("needs at least one directional trade");
        return DirectionPercentages {
            long_percent: missing.clone(),
            short_percent: missing,
        };
    }

    let long_percent = (long_trades / total) * 100.0;
    DirectionPercentages {
        long_percent: metric(long_percent),
        short_percent: metric(100.0 - long_percent),
    }
}

/// 100 is most stable; each percent of net P&L lost on the worst day costs a point.
pub fn compute_stability_score_from_worst_day_percent(worst_day_percent_of_net: Option<f64>) -> MetricValue {
    match worst_day_percent_of_net {
        Some(percent) if percent.is_finite() => metric((100.0 - percent.abs()).clamp(0.0, 100.0)),
        _ => missing_metric("needs worst day % of net PnL"),
    }
}

pub(crate) fn safe_count(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
