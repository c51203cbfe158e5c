//! One call per dashboard render: fans the account snapshot out to every metric group.

use crate::activity::{compute_activity_metrics, ActivityMetrics, ActivityMetricsInput};
use crate::config::InsightThresholds;
use crate::direction::{build_direction_samples, compute_direction_extras, DirectionExtrasMetrics};
use crate::metric::{metric, metric_or_missing, missing_metric, MetricValue, EPSILON};
use crate::models::{AccountSummary, DashboardMetricsInput};
use crate::payoff::{compute_payoff_extras, PayoffExtrasInput, PayoffExtrasMetrics};
use crate::ratios::{
    compute_breakeven_win_rate, compute_direction_percentages, compute_drawdown_percent_of_net_pnl,
    compute_win_duration_ratio, compute_win_loss_ratio,
};
use crate::stability::{compute_day_stability, DayStabilityMetrics};
use crate::sustainability::{compute_sustainability, SustainabilityInputs, SustainabilityResult};
use crate::swing::{compute_swing_extras, SwingExtrasMetrics};
use log::debug;
use serde::Serialize;

const INCOMPLETE_HISTORY_REASON: &str = "needs complete closed-trade history for this range";
const NO_SIDE_VALUES_REASON: &str = "needs closed trades with buy/sell side values";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionMetrics {
    pub long_trades: MetricValue,
    pub short_trades: MetricValue,
    pub long_percent: MetricValue,
    pub short_percent: MetricValue,
    pub long_pnl: MetricValue,
    pub short_pnl: MetricValue,
    pub long_win_rate: MetricValue,
    pub short_win_rate: MetricValue,
    pub long_expectancy: MetricValue,
    pub short_expectancy: MetricValue,
    pub long_profit_factor: MetricValue,
    pub short_profit_factor: MetricValue,
    pub long_avg_win: MetricValue,
    pub short_avg_win: MetricValue,
    pub long_avg_loss: MetricValue,
    pub short_avg_loss: MetricValue,
    pub long_large_loss_rate: MetricValue,
    pub short_large_loss_rate: MetricValue,
    pub long_pnl_share: MetricValue,
    pub short_pnl_share: MetricValue,
    pub insight: String,
}

impl DirectionMetrics {
    /// Every field missing with the same reason.
    fn unavailable(reason: &str) -> Self {
        let missing = missing_metric(reason);
        let insight = format!("N/A ({reason})");
        DirectionMetrics {
            long_trades: missing.clone(),
            short_trades: missing.clone(),
            long_percent: missing.clone(),
            short_percent: missing.clone(),
            long_pnl: missing.clone(),
            short_pnl: missing.clone(),
            long_win_rate: missing.clone(),
            short_win_rate: missing.clone(),
            long_expectancy: missing.clone(),
            short_expectancy: missing.clone(),
            long_profit_factor: missing.clone(),
            short_profit_factor: missing.clone(),
            long_avg_win: missing.clone(),
            short_avg_win: missing.clone(),
            long_avg_loss: missing.clone(),
            short_avg_loss: missing.clone(),
            long_large_loss_rate: missing.clone(),
            short_large_loss_rate: missing.clone(),
            long_pnl_share: missing.clone(),
            short_pnl_share: missing,
            insight,
        }
    }

    fn from_extras(extras: DirectionExtrasMetrics) -> Self {
        let percentages = compute_direction_percentages(
            extras.long.trades.value_or(0.0),
            extras.short.trades.value_or(0.0),
        );
        let DirectionExtrasMetrics {
            long,
            short,
            long_pnl_share,
            short_pnl_share,
            insight,
        } = extras;

        DirectionMetrics {
            long_trades: long.trades,
            short_trades: short.trades,
            long_percent: percentages.long_percent,
            short_percent: percentages.short_percent,
            long_pnl: long.pnl,
            short_pnl: short.pnl,
            long_win_rate: long.win_rate,
            short_win_rate: short.win_rate,
            long_expectancy: long.expectancy,
            short_expectancy: short.expectancy,
            long_profit_factor: long.profit_factor,
            short_profit_factor: short.profit_factor,
            long_avg_win: long.avg_win,
            short_avg_win: short.avg_win,
            long_avg_loss: long.avg_loss,
            short_avg_loss: short.avg_loss,
            long_large_loss_rate: long.large_loss_rate,
            short_large_loss_rate: short.large_loss_rate,
            long_pnl_share,
            short_pnl_share,
            insight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMetrics {
    #[serde(flatten)]
    pub day: DayStabilityMetrics,
    /// Carries the swing insight, which is the stability insight.
    #[serde(flatten)]
    pub swing: SwingExtrasMetrics,
    pub drawdown_percent_of_net_pnl: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffMetrics {
    pub avg_win: MetricValue,
    pub avg_loss: MetricValue,
    pub breakeven_win_rate: MetricValue,
    pub current_win_rate: MetricValue,
    #[serde(flatten)]
    pub extras: PayoffExtrasMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySection {
    pub median_trades_per_day: MetricValue,
    pub max_trades_in_day: MetricValue,
    pub trades_per_week: MetricValue,
    pub active_days_per_week: MetricValue,
    pub trades_per_active_hour: MetricValue,
    pub range_days: MetricValue,
}

impl From<ActivityMetrics> for ActivitySection {
    fn from(activity: ActivityMetrics) -> Self {
        const NO_ACTIVE_DAYS: &str = "needs active trading days";
        const NO_RANGE: &str = "needs a known date range";
        ActivitySection {
            median_trades_per_day: metric_or_missing(activity.median_trades_per_day, NO_ACTIVE_DAYS),
            max_trades_in_day: metric_or_missing(activity.max_trades_in_day, NO_ACTIVE_DAYS),
            trades_per_week: metric_or_missing(activity.trades_per_week, NO_RANGE),
            active_days_per_week: metric_or_missing(activity.active_days_per_week, NO_RANGE),
            trades_per_active_hour: metric_or_missing(
                activity.trades_per_active_hour,
                "needs active trading hours",
            ),
            range_days: metric_or_missing(activity.range_days, NO_RANGE),
        }
    }
}

/// Immutable result of one orchestration call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDerivedMetrics {
    pub win_loss_ratio: MetricValue,
    pub win_duration_over_loss_duration: MetricValue,
    pub direction: DirectionMetrics,
    pub stability: StabilityMetrics,
    pub payoff: PayoffMetrics,
    pub sustainability: SustainabilityResult,
    pub activity: ActivitySection,
}

pub fn compute_dashboard_derived_metrics_default(
    input: &DashboardMetricsInput,
) -> DashboardDerivedMetrics {
    compute_dashboard_derived_metrics(input, &InsightThresholds::default())
}

pub fn compute_dashboard_derived_metrics(
    input: &DashboardMetricsInput,
    thresholds: &InsightThresholds,
) -> DashboardDerivedMetrics {
    let summary = &input.summary;
    let history_issue = directional_history_issue(input);

    let direction = compute_direction_section(input, history_issue.as_deref(), thresholds);
    let stability = compute_stability_section(input, thresholds);
    let payoff = compute_payoff_section(input, history_issue.as_deref(), thresholds);

    let sustainability = compute_sustainability(&SustainabilityInputs {
        net_pnl: summary.net_pnl,
        profit_per_day: summary.profit_per_day,
        max_drawdown: summary.max_drawdown,
        best_day: stability.day.best_day.value_or(0.0),
        worst_day: stability.day.worst_day.value_or(0.0),
        daily_pnl_volatility: stability.day.daily_pnl_volatility.value_or(0.0),
    });

    let activity = compute_activity_metrics(&ActivityMetricsInput {
        total_trades: summary.trade_count as f64,
        active_days: summary.active_days as f64,
        daily_pnl_days: &input.daily_pnl_days,
        range_start: input.range_start.as_deref(),
        range_end: input.range_end.as_deref(),
        active_hours: resolve_active_hours(input.active_hours, summary),
    });

    DashboardDerivedMetrics {
        win_loss_ratio: compute_win_loss_ratio(summary.avg_win, summary.avg_loss),
        win_duration_over_loss_duration: compute_win_duration_ratio(
            summary.avg_win_duration_minutes,
            summary.avg_loss_duration_minutes,
        ),
        direction,
        stability,
        payoff,
        sustainability,
        activity: activity.into(),
    }
}

/// Reason the loaded trades cannot stand in for the whole range, if any.
fn directional_history_issue(input: &DashboardMetricsInput) -> Option<String> {
    if let Some(issue) = input.direction_issue() {
        return Some(issue.to_string());
    }
    let loaded_trades = i64::try_from(input.trades.len()).unwrap_or(i64::MAX);
    if !input.has_complete_directional_history || input.summary.trade_count > loaded_trades {
        return Some(INCOMPLETE_HISTORY_REASON.to_string());
    }
    None
}

fn compute_direction_section(
    input: &DashboardMetricsInput,
    history_issue: Option<&str>,
    thresholds: &InsightThresholds,
) -> DirectionMetrics {
    if let Some(reason) = history_issue {
        debug!("Direction metrics unavailable: {}", reason);
        return DirectionMetrics::unavailable(reason);
    }

    let samples = build_direction_samples(&input.trades);
    if input.summary.trade_count > 0 && samples.is_empty() {
        debug!(
            "Direction metrics unavailable: none of {} trades has a usable side",
            input.trades.len()
        );
        return DirectionMetrics::unavailable(NO_SIDE_VALUES_REASON);
    }

    DirectionMetrics::from_extras(compute_direction_extras(
        &samples,
        input.summary.net_pnl,
        thresholds,
    ))
}

fn compute_stability_section(
    input: &DashboardMetricsInput,
    thresholds: &InsightThresholds,
) -> StabilityMetrics {
    let summary = &input.summary;
    StabilityMetrics {
        day: compute_day_stability(&input.daily_pnl_days, summary.net_pnl),
        swing: compute_swing_extras(&input.daily_pnl_days, summary.profit_per_day, thresholds),
        drawdown_percent_of_net_pnl: compute_drawdown_percent_of_net_pnl(
            summary.max_drawdown,
            summary.net_pnl,
        ),
    }
}

fn compute_payoff_section(
    input: &DashboardMetricsInput,
    history_issue: Option<&str>,
    thresholds: &InsightThresholds,
) -> PayoffMetrics {
    let summary = &input.summary;
    let breakeven_win_rate = compute_breakeven_win_rate(summary.avg_win, summary.avg_loss);

    if let Some(reason) = history_issue {
        debug!("Payoff trade distribution unavailable: {}", reason);
    }

    let extras = compute_payoff_extras(
        &PayoffExtrasInput {
            trades: &input.trades,
            avg_win: summary.avg_win,
            avg_loss: summary.avg_loss,
            current_win_rate: summary.win_rate,
            breakeven_win_rate: breakeven_win_rate.value(),
            can_use_trade_distribution: history_issue.is_none(),
            trade_distribution_reason: history_issue.unwrap_or(INCOMPLETE_HISTORY_REASON),
        },
        thresholds,
    );

    PayoffMetrics {
        avg_win: metric(summary.avg_win),
        avg_loss: metric(summary.avg_loss),
        breakeven_win_rate,
        current_win_rate: metric(summary.win_rate),
        extras,
    }
}

/// Explicit hours win; otherwise net P&L over the per-hour efficiency.
fn resolve_active_hours(active_hours: Option<f64>, summary: &AccountSummary) -> Option<f64> {
    if let Some(hours) = active_hours.filter(|hours| hours.is_finite() && *hours > 0.0) {
        return Some(hours);
    }
    let net = summary.net_pnl.abs();
    let per_hour = summary.efficiency_per_hour.abs();
    if net.is_finite() && per_hour.is_finite() && net > EPSILON && per_hour > EPSILON {
        Some(net / per_hour)
    } else {
        None
    }
}
