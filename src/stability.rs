use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use crate::models::AccountPnlCalendarDay;
use crate::ratios::compute_stability_score_from_worst_day_percent;
use crate::stats::{max_value, min_value, population_standard_deviation};
use crate::swing::daily_net_values;
use serde::Serialize;

const MISSING_DAILY_SERIES_REASON: &str = "needs daily net PnL values grouped by trading day";
const MISSING_NET_PNL_REASON: &str = "needs non-zero net PnL for percentage ratios";

/// Best/worst day concentration and day-to-day volatility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStabilityMetrics {
    pub best_day: MetricValue,
    pub worst_day: MetricValue,
    pub daily_pnl_volatility: MetricValue,
    pub best_day_percent_of_net: MetricValue,
    pub worst_day_percent_of_net: MetricValue,
    pub stability_score: MetricValue,
}

/// The daily series must already be grouped by account-local trading day.
pub fn compute_day_stability(days: &[AccountPnlCalendarDay], net_pnl: f64) -> DayStabilityMetrics {
    let daily_net = daily_net_values(days);

    let (Some(best_day), Some(worst_day)) = (max_value(&daily_net), min_value(&daily_net)) else {
        return DayStabilityMetrics {
            best_day: missing_metric(MISSING_DAILY_SERIES_REASON),
            worst_day: missing_metric(MISSING_DAILY_SERIES_REASON),
            daily_pnl_volatility: missing_metric(MISSING_DAILY_SERIES_REASON),
            best_day_percent_of_net: missing_metric(MISSING_DAILY_SERIES_REASON),
            worst_day_percent_of_net: missing_metric(MISSING_DAILY_SERIES_REASON),
            stability_score: compute_stability_score_from_worst_day_percent(None),
        };
    };

    let daily_pnl_volatility = population_standard_deviation(&daily_net);

    if net_pnl.abs() <= EPSILON || !net_pnl.is_finite() {
        return DayStabilityMetrics {
            best_day: metric(best_day),
            worst_day: metric(worst_day),
            daily_pnl_volatility: metric(daily_pnl_volatility),
            best_day_percent_of_net: missing_metric(MISSING_NET_PNL_REASON),
            worst_day_percent_of_net: missing_metric(MISSING_NET_PNL_REASON),
            stability_score: compute_stability_score_from_worst_day_percent(None),
        };
    }

    let best_day_percent_of_net = (best_day / net_pnl) * 100.0;
    let worst_day_percent_of_net = (worst_day.abs() / net_pnl) * 100.0;

    DayStabilityMetrics {
        best_day: metric(best_day),
        worst_day: metric(worst_day),
        daily_pnl_volatility: metric(daily_pnl_volatility),
        best_day_percent_of_net: metric(best_day_percent_of_net),
        worst_day_percent_of_net: metric(worst_day_percent_of_net),
        stability_score: compute_stability_score_from_worst_day_percent(Some(
            worst_day_percent_of_net,
        )),
    }
}
