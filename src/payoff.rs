use crate::config::InsightThresholds;
use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use crate::models::AccountTrade;
use crate::stats::{average, percentile};
use serde::Serialize;

const MFE_REASON: &str = "needs MFE data";
const MAE_REASON: &str = "needs MAE data";

pub struct PayoffExtrasInput<'a> {
    pub trades: &'a [AccountTrade],
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Percent.
    pub current_win_rate: f64,
    pub breakeven_win_rate: Option<f64>,
    pub can_use_trade_distribution: bool,
    pub trade_distribution_reason: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffExtrasMetrics {
    pub wr_cushion: MetricValue,
    pub large_loss_threshold: MetricValue,
    pub large_loss_rate: MetricValue,
    pub p95_loss: MetricValue,
    pub capture: MetricValue,
    pub containment: MetricValue,
    pub insight: String,
}

pub fn compute_payoff_extras(
    input: &PayoffExtrasInput<'_>,
    thresholds: &InsightThresholds,
) -> PayoffExtrasMetrics {
    let wr_cushion = match input.breakeven_win_rate {
        Some(breakeven) => metric(input.current_win_rate - breakeven),
        None => missing_metric("needs breakeven win rate"),
    };

    if !input.can_use_trade_distribution {
        let missing = missing_metric(input.trade_distribution_reason);
        let insight = compute_payoff_insight(
            input.current_win_rate,
            input.breakeven_win_rate,
            &missing,
            &missing,
            thresholds,
        );
        return PayoffExtrasMetrics {
            wr_cushion,
            large_loss_threshold: missing.clone(),
            large_loss_rate: missing.clone(),
            p95_loss: missing,
            capture: missing_metric(MFE_REASON),
            containment: missing_metric(MAE_REASON),
            insight,
        };
    }

    let pnl_values: Vec<f64> = input
        .trades
        .iter()
        .filter_map(|trade| trade.pnl)
        .filter(|pnl| pnl.is_finite())
        .collect();
    let loss_magnitudes: Vec<f64> = pnl_values
        .iter()
        .filter(|pnl| **pnl < 0.0)
        .map(|loss| loss.abs())
        .collect();

    let threshold_value = thresholds.large_loss_multiple * input.avg_loss.abs();
    let large_loss_threshold = if threshold_value <= EPSILON {
        missing_metric("needs non-zero average loss")
    } else {
        metric(threshold_value)
    };
    let large_loss_rate = compute_large_loss_rate(&pnl_values, &large_loss_threshold);

    let p95_loss = if loss_magnitudes.len() < thresholds.p95_min_losses {
        missing_metric(format!(
            "needs at least {} losing trades",
            thresholds.p95_min_losses
        ))
    } else {
        match percentile(&loss_magnitudes, thresholds.p95_percentile) {
            Some(magnitude) => metric(-magnitude),
            None => missing_metric(format!(
                "needs at least {} losing trades",
                thresholds.p95_min_losses
            )),
        }
    };

    let capture = compute_capture(input.trades, input.avg_win);
    let containment = compute_containment(input.trades, input.avg_loss);

    let insight = compute_payoff_insight(
        input.current_win_rate,
        input.breakeven_win_rate,
        &large_loss_rate,
        &capture,
        thresholds,
    );

    PayoffExtrasMetrics {
        wr_cushion,
        large_loss_threshold,
        large_loss_rate,
        p95_loss,
        capture,
        containment,
        insight,
    }
}

fn compute_large_loss_rate(pnl_values: &[f64], large_loss_threshold: &MetricValue) -> MetricValue {
    let Some(threshold) = large_loss_threshold.value() else {
        return missing_metric("needs non-zero average loss");
    };
    if pnl_values.is_empty() {
        return missing_metric("needs closed trade PnL data");
    }

    let large_losses = pnl_values.iter().filter(|pnl| **pnl <= -threshold).count();
    metric((large_losses as f64 / pnl_values.len() as f64) * 100.0)
}

/// Average win as a share of the average favorable excursion on winners.
fn compute_capture(trades: &[AccountTrade], avg_win: f64) -> MetricValue {
    let winning_mfe = excursions(trades, |pnl| pnl > 0.0, |trade| trade.mfe);
    match average(&winning_mfe) {
        Some(avg_mfe) if avg_mfe > EPSILON => metric(avg_win / avg_mfe),
        _ => missing_metric(MFE_REASON),
    }
}

/// Average loss as a share of the average adverse excursion on losers.
fn compute_containment(trades: &[AccountTrade], avg_loss: f64) -> MetricValue {
    let losing_mae = excursions(trades, |pnl| pnl < 0.0, |trade| trade.mae);
    match average(&losing_mae) {
        Some(avg_mae) if avg_mae > EPSILON => metric(avg_loss.abs() / avg_mae),
        _ => missing_metric(MAE_REASON),
    }
}

fn excursions<P, E>(trades: &[AccountTrade], pnl_filter: P, excursion: E) -> Vec<f64>
where
    P: Fn(f64) -> bool,
    E: Fn(&AccountTrade) -> Option<f64>,
{
    trades
        .iter()
        .filter(|trade| trade.pnl.is_some_and(&pnl_filter))
        .filter_map(&excursion)
        .filter(|value| value.is_finite())
        .map(f64::abs)
        .filter(|value| *value > EPSILON)
        .collect()
}

fn compute_payoff_insight(
    current_win_rate: f64,
    breakeven_win_rate: Option<f64>,
    large_loss_rate: &MetricValue,
    capture: &MetricValue,
    thresholds: &InsightThresholds,
) -> String {
    if let Some(breakeven) = breakeven_win_rate {
        if current_win_rate < breakeven {
            return "Your win rate is below breakeven for this payoff.".to_string();
        }
    }
    if large_loss_rate
        .value()
        .is_some_and(|rate| rate > thresholds.payoff_large_loss_warning_rate)
    {
        return "Large losses happen often, tighten stops or reduce size.".to_string();
    }
    if capture
        .value()
        .is_some_and(|ratio| ratio < thresholds.capture_warning_ratio)
    {
        return "You're capturing a small share of MFE, review exits.".to_string();
    }
    if breakeven_win_rate.is_none() {
        return "N/A (needs breakeven win rate)".to_string();
    }
    "Payoff supports your current win rate.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionSide;
    use chrono::{TimeZone, Utc};

    fn trade(id: i64, pnl: f64) -> AccountTrade {
        AccountTrade {
            id,
            account_id: 1,
            contract_id: format!("C-{id}"),
            symbol: "ES".to_string(),
            side: if pnl >= 0.0 {
                ExecutionSide::Sell
            } else {
                ExecutionSide::Buy
            },
            size: 1.0,
            price: 100.0,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            fees: 0.0,
            pnl: Some(pnl),
            order_id: format!("O-{id}"),
            source_trade_id: None,
            mfe: None,
            mae: None,
        }
    }

    fn with_excursions(mut trade: AccountTrade, mfe: Option<f64>, mae: Option<f64>) -> AccountTrade {
        trade.mfe = mfe;
        trade.mae = mae;
        trade
    }

    fn input<'a>(
        trades: &'a [AccountTrade],
        avg_win: f64,
        avg_loss: f64,
        current_win_rate: f64,
        breakeven_win_rate: Option<f64>,
    ) -> PayoffExtrasInput<'a> {
        PayoffExtrasInput {
            trades,
            avg_win,
            avg_loss,
            current_win_rate,
            breakeven_win_rate,
            can_use_trade_distribution: true,
            trade_distribution_reason: "",
        }
    }

    #[test]
    fn large_loss_rate_from_twice_average_loss() {
        let trades = vec![
            trade(1, -50.0),
            trade(2, -250.0),
            trade(3, -300.0),
            trade(4, 100.0),
            trade(5, 200.0),
        ];
        let result = compute_payoff_extras(
            &input(&trades, 150.0, -100.0, 40.0, Some(35.0)),
            &InsightThresholds::default(),
        );

        assert!((result.large_loss_threshold.value().unwrap() - 200.0).abs() < 1e-9);
        assert!((result.large_loss_rate.value().unwrap() - 40.0).abs() < 1e-9);
        assert!((result.wr_cushion.value().unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(
            result.insight,
            "Large losses happen often, tighten stops or reduce size."
        );
    }

    #[test]
    fn p95_loss_uses_loss_magnitudes() {
        let trades = vec![
            trade(1, -50.0),
            trade(2, -80.0),
            trade(3, -120.0),
            trade(4, -200.0),
            trade(5, -250.0),
            trade(6, -400.0),
            trade(7, 100.0),
        ];
        let result = compute_payoff_extras(
            &input(&trades, 100.0, -120.0, 45.0, Some(40.0)),
            &InsightThresholds::default(),
        );

        assert!((result.p95_loss.value().unwrap() + 362.5).abs() < 1e-9);
    }

    #[test]
    fn p95_loss_needs_five_losses() {
        let trades = vec![trade(1, -50.0), trade(2, -80.0), trade(3, 20.0)];
        let result = compute_payoff_extras(
            &input(&trades, 20.0, -65.0, 33.0, Some(76.0)),
            &InsightThresholds::default(),
        );
        assert_eq!(
            result.p95_loss.missing_reason(),
            Some("needs at least 5 losing trades")
        );
        assert_eq!(
            result.insight,
            "Your win rate is below breakeven for this payoff."
        );
    }

    #[test]
    fn capture_and_containment_from_excursions() {
        let trades = vec![
            with_excursions(trade(1, 100.0), Some(300.0), None),
            with_excursions(trade(2, 60.0), Some(-100.0), None),
            with_excursions(trade(3, -40.0), None, Some(-80.0)),
            with_excursions(trade(4, -60.0), Some(10.0), Some(120.0)),
        ];
        let result = compute_payoff_extras(
            &input(&trades, 80.0, -50.0, 50.0, Some(38.0)),
            &InsightThresholds::default(),
        );

        // mean |MFE| on winners = 200, mean |MAE| on losers = 100.
        assert!((result.capture.value().unwrap() - 0.4).abs() < 1e-9);
        assert!((result.containment.value().unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(result.insight, "Payoff supports your current win rate.");
    }

    #[test]
    fn low_capture_warns_about_exits() {
        let trades = vec![
            with_excursions(trade(1, 30.0), Some(200.0), None),
            trade(2, -10.0),
        ];
        let result = compute_payoff_extras(
            &input(&trades, 30.0, -10.0, 50.0, Some(25.0)),
            &InsightThresholds::default(),
        );
        assert!((result.capture.value().unwrap() - 0.15).abs() < 1e-9);
        assert_eq!(
            result.insight,
            "You're capturing a small share of MFE, review exits."
        );
    }

    #[test]
    fn missing_excursions_are_reported() {
        let trades = vec![trade(1, 30.0), trade(2, -10.0)];
        let result = compute_payoff_extras(
            &input(&trades, 30.0, -10.0, 50.0, Some(25.0)),
            &InsightThresholds::default(),
        );
        assert_eq!(result.capture.missing_reason(), Some("needs MFE data"));
        assert_eq!(result.containment.missing_reason(), Some("needs MAE data"));
    }

    #[test]
    fn incomplete_history_marks_distribution_fields_missing() {
        let trades = vec![trade(1, -500.0)];
        let mut payoff_input = input(&trades, 100.0, -100.0, 60.0, Some(50.0));
        payoff_input.can_use_trade_distribution = false;
        payoff_input.trade_distribution_reason = "needs complete closed-trade history for this range";

        let result = compute_payoff_extras(&payoff_input, &InsightThresholds::default());
        let reason = Some("needs complete closed-trade history for this range");
        assert_eq!(result.large_loss_threshold.missing_reason(), reason);
        assert_eq!(result.large_loss_rate.missing_reason(), reason);
        assert_eq!(result.p95_loss.missing_reason(), reason);
        assert_eq!(result.capture.missing_reason(), Some("needs MFE data"));
        assert_eq!(result.containment.missing_reason(), Some("needs MAE data"));
        assert!((result.wr_cushion.value().unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(result.insight, "Payoff supports your current win rate.");
    }

    #[test]
    fn unknown_breakeven_is_not_available() {
        let trades = vec![trade(1, 10.0)];
        let result = compute_payoff_extras(
            &input(&trades, 10.0, 0.0, 100.0, None),
            &InsightThresholds::default(),
        );
        assert!(result.wr_cushion.is_missing());
        assert!(result.large_loss_threshold.is_missing());
        assert_eq!(
            result.large_loss_rate.missing_reason(),
            Some("needs non-zero average loss")
        );
        assert_eq!(result.insight, "N/A (needs breakeven win rate)");
    }
}
