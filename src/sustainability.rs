use crate::metric::{metric, missing_metric, MetricValue, EPSILON};
use crate::stats::clamp_score;
use serde::Serialize;
use std::fmt;

const MISSING_DENOMINATOR_REASON: &str = "needs non-zero net PnL and profit per day";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SustainabilityInputs {
    pub net_pnl: f64,
    pub profit_per_day: f64,
    pub max_drawdown: f64,
    pub best_day: f64,
    pub worst_day: f64,
    pub daily_pnl_volatility: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SustainabilityLabel {
    Healthy,
    #[serde(rename = "Mostly healthy")]
    MostlyHealthy,
    Unstable,
    Unsustainable,
}

impl SustainabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SustainabilityLabel::Healthy => "Healthy",
            SustainabilityLabel::MostlyHealthy => "Mostly healthy",
            SustainabilityLabel::Unstable => "Unstable",
            SustainabilityLabel::Unsustainable => "Unsustainable",
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SustainabilityLabel::Healthy
        } else if score >= 60.0 {
            SustainabilityLabel::MostlyHealthy
        } else if score >= 40.0 {
            SustainabilityLabel::Unstable
        } else {
            SustainabilityLabel::Unsustainable
        }
    }
}

impl fmt::Display for SustainabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized ratios behind the subscores. Missing when a denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityRatios {
    pub swing_ratio: MetricValue,
    pub best_day_pct: MetricValue,
    pub worst_day_pct: MetricValue,
    pub dd_ratio: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityResult {
    pub score: f64,
    pub label: SustainabilityLabel,
    pub swing_score: f64,
    pub outlier_score: f64,
    pub risk_score: f64,
    pub debug: SustainabilityRatios,
}

pub fn compute_sustainability(input: &SustainabilityInputs) -> SustainabilityResult {
    let net_pnl = finite_or_zero(input.net_pnl);
    let profit_per_day = finite_or_zero(input.profit_per_day);
    let max_drawdown = finite_or_zero(input.max_drawdown);
    let best_day = finite_or_zero(input.best_day);
    let worst_day = finite_or_zero(input.worst_day);
    let daily_pnl_volatility = finite_or_zero(input.daily_pnl_volatility);

    let net_magnitude = net_pnl.abs();
    let profit_per_day_magnitude = profit_per_day.abs();

    if net_magnitude <= EPSILON || profit_per_day_magnitude <= EPSILON {
        let missing = missing_metric(MISSING_DENOMINATOR_REASON);
        return SustainabilityResult {
            score: 0.0,
            label: SustainabilityLabel::Unsustainable,
            swing_score: 0.0,
            outlier_score: 0.0,
            risk_score: 0.0,
            debug: SustainabilityRatios {
                swing_ratio: missing.clone(),
                best_day_pct: missing.clone(),
                worst_day_pct: missing.clone(),
                dd_ratio: missing,
            },
        };
    }

    let best_day_pct = best_day / net_magnitude;
    let worst_day_pct = worst_day.abs() / net_magnitude;
    let swing_ratio = daily_pnl_volatility / profit_per_day_magnitude;
    let dd_ratio = max_drawdown.abs() / net_magnitude;

    // Volatility beyond one average day costs 35 points per extra day.
    let swing_score = clamp_score(100.0 - 35.0 * (swing_ratio - 1.0));
    let outlier_score = clamp_score(100.0 - (70.0 * best_day_pct + 90.0 * worst_day_pct));
    let risk_score = clamp_score(100.0 - 120.0 * dd_ratio);

    let score = ((swing_score + outlier_score + risk_score) / 3.0).round();

    SustainabilityResult {
        score,
        label: SustainabilityLabel::from_score(score),
        swing_score,
        outlier_score,
        risk_score,
        debug: SustainabilityRatios {
            swing_ratio: metric(swing_ratio),
            best_day_pct: metric(best_day_pct),
            worst_day_pct: metric(worst_day_pct),
            dd_ratio: metric(dd_ratio),
        },
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
