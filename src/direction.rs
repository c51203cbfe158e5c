//! Long/short attribution of closed executions.
//!
//! Direction is not stored on a trade row. It is inferred from the execution
//! side of the *closing* fill: a SELL normally closes a long, a BUY normally
//! closes a short. That only holds for open-then-close round trips; feeding
//! opening executions would invert every result, so callers must pass closed
//! trades only.

use crate::config::InsightThresholds;
use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use crate::models::{AccountTrade, ExecutionSide};
use crate::stats::{average, sum};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl TradeDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TradeDirection::Long => "long",
            TradeDirection::Short => "short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionSample {
    pub direction: TradeDirection,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionSideMetrics {
    pub trades: MetricValue,
    pub win_rate: MetricValue,
    pub pnl: MetricValue,
    pub expectancy: MetricValue,
    pub profit_factor: MetricValue,
    pub avg_win: MetricValue,
    pub avg_loss: MetricValue,
    pub large_loss_rate: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionExtrasMetrics {
    pub long: DirectionSideMetrics,
    pub short: DirectionSideMetrics,
    pub long_pnl_share: MetricValue,
    pub short_pnl_share: MetricValue,
    pub insight: String,
}

/// Closing side to position direction. The one place the side heuristic lives.
pub fn infer_direction(side: ExecutionSide) -> Option<TradeDirection> {
    match side {
        ExecutionSide::Sell | ExecutionSide::Long => Some(TradeDirection::Long),
        ExecutionSide::Buy | ExecutionSide::Short => Some(TradeDirection::Short),
        ExecutionSide::Unknown => None,
    }
}

/// Drops trades without a finite P&L or with an unclassifiable side.
pub fn build_direction_samples(trades: &[AccountTrade]) -> Vec<DirectionSample> {
    trades
        .iter()
        .filter_map(|trade| {
            let direction = infer_direction(trade.side)?;
            let pnl = trade.pnl.filter(|value| value.is_finite())?;
            Some(DirectionSample { direction, pnl })
        })
        .collect()
}

pub fn compute_direction_extras(
    samples: &[DirectionSample],
    net_pnl: f64,
    thresholds: &InsightThresholds,
) -> DirectionExtrasMetrics {
    let long_pnls = pnls_for(samples, TradeDirection::Long);
    let short_pnls = pnls_for(samples, TradeDirection::Short);

    let long = compute_side_metrics(&long_pnls, TradeDirection::Long, thresholds);
    let short = compute_side_metrics(&short_pnls, TradeDirection::Short, thresholds);

    let long_pnl_share = pnl_share(&long.pnl, net_pnl);
    let short_pnl_share = pnl_share(&short.pnl, net_pnl);

    let insight = compute_direction_insight(&long, &short, thresholds);

    DirectionExtrasMetrics {
        long,
        short,
        long_pnl_share,
        short_pnl_share,
        insight,
    }
}

fn pnls_for(samples: &[DirectionSample], direction: TradeDirection) -> Vec<f64> {
    samples
        .iter()
        .filter(|sample| sample.direction == direction)
        .map(|sample| sample.pnl)
        .collect()
}

fn pnl_share(side_pnl: &MetricValue, net_pnl: f64) -> MetricValue {
    let denominator = net_pnl.abs();
    match side_pnl.value() {
        Some(pnl) if denominator > EPSILON => metric((pnl / denominator) * 100.0),
        _ => missing_metric("needs non-zero net PnL"),
    }
}

fn compute_side_metrics(
    pnls: &[f64],
    direction: TradeDirection,
    thresholds: &InsightThresholds,
) -> DirectionSideMetrics {
    let side = direction.label();

    if pnls.is_empty() {
        let no_trades = format!("needs at least one {side} trade");
        return DirectionSideMetrics {
            trades: metric(0.0),
            win_rate: missing_metric(no_trades.clone()),
            pnl: metric(0.0),
            expectancy: missing_metric(no_trades),
            profit_factor: missing_metric(format!("needs {side} wins and losses")),
            avg_win: missing_metric(format!("needs {side} winning trades")),
            avg_loss: missing_metric(format!("needs {side} losing trades")),
            large_loss_rate: missing_metric(format!("needs {side} losses")),
        };
    }

    let wins: Vec<f64> = pnls.iter().copied().filter(|pnl| *pnl > 0.0).collect();
    let losses: Vec<f64> = pnls.iter().copied().filter(|pnl| *pnl < 0.0).collect();
    let trade_count = pnls.len() as f64;

    let pnl_total = sum(pnls);
    let gross_wins = sum(&wins);
    let gross_loss_abs = sum(&losses).abs();
    let avg_win = average(&wins);
    let avg_loss = average(&losses);

    let profit_factor = if gross_loss_abs <= EPSILON {
        missing_metric(format!("needs {side} losing trades"))
    } else {
        metric(gross_wins / gross_loss_abs)
    };

    DirectionSideMetrics {
        trades: metric(trade_count),
        win_rate: metric((wins.len() as f64 / trade_count) * 100.0),
        pnl: metric(pnl_total),
        expectancy: metric(pnl_total / trade_count),
        profit_factor,
        avg_win: match avg_win {
            Some(value) => metric(value),
            None => missing_metric(format!("needs {side} winning trades")),
        },
        avg_loss: match avg_loss {
            Some(value) => metric(value),
            None => missing_metric(format!("needs {side} losing trades")),
        },
        large_loss_rate: side_large_loss_rate(pnls, avg_loss, side, thresholds),
    }
}

fn side_large_loss_rate(
    pnls: &[f64],
    avg_loss: Option<f64>,
    side: &str,
    thresholds: &InsightThresholds,
) -> MetricValue {
    let Some(avg_loss) = avg_loss.filter(|loss| loss.abs() > EPSILON) else {
        return missing_metric(format!("needs {side} losses"));
    };

    let threshold = thresholds.large_loss_multiple * avg_loss.abs();
    let large_losses = pnls.iter().filter(|pnl| **pnl <= -threshold).count();
    metric((large_losses as f64 / pnls.len() as f64) * 100.0)
}

fn compute_direction_insight(
    long: &DirectionSideMetrics,
    short: &DirectionSideMetrics,
    thresholds: &InsightThresholds,
) -> String {
    let margin = thresholds.direction_outperform_margin;

    let message = match (long.expectancy.value(), short.expectancy.value()) {
        (Some(long_expectancy), Some(short_expectancy)) => {
            if outperforms(short_expectancy, long_expectancy, margin) {
                "Shorts outperform longs on expectancy."
            } else if outperforms(long_expectancy, short_expectancy, margin) {
                "Longs outperform shorts on expectancy."
            } else {
                "Expectancy is similar, bias can be based on market regime."
            }
        }
        _ => "N/A (needs long/short expectancy data)",
    };

    if let (Some(long_rate), Some(short_rate)) =
        (long.large_loss_rate.value(), short.large_loss_rate.value())
    {
        if long_rate > short_rate + EPSILON {
            return format!("{message} Large losses are worse on longs.");
        }
        if short_rate > long_rate + EPSILON {
            return format!("{message} Large losses are worse on shorts.");
        }
    }

    message.to_string()
}

fn outperforms(candidate: f64, baseline: f64, margin: f64) -> bool {
    let denominator = baseline.abs().max(EPSILON);
    (candidate - baseline) / denominator >= margin
}
