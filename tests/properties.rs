//! Property-based checks for the numeric kernel and the metric contract.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use dashboard_metrics::metric::{metric, missing_metric};
use dashboard_metrics::models::{
    AccountPnlCalendarDay, AccountSummary, AccountTrade, DashboardMetricsInput, ExecutionSide,
};
use dashboard_metrics::ratios::compute_breakeven_win_rate;
use dashboard_metrics::stats::{median, percentile};
use dashboard_metrics::compute_dashboard_derived_metrics_default;
use proptest::prelude::*;

fn finite_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6f64, 1..64)
}

fn side() -> impl Strategy<Value = ExecutionSide> {
    prop_oneof![
        Just(ExecutionSide::Buy),
        Just(ExecutionSide::Sell),
        Just(ExecutionSide::Long),
        Just(ExecutionSide::Short),
        Just(ExecutionSide::Unknown),
    ]
}

fn snapshot() -> impl Strategy<Value = DashboardMetricsInput> {
    let trades = prop::collection::vec(
        (side(), -500.0..500.0f64, prop::option::of(0.0..800.0f64)),
        0..24,
    );
    let days = prop::collection::vec((0i64..12, -2_000.0..2_000.0f64), 0..15);
    (trades, days, any::<bool>(), -5_000.0..5_000.0f64, 0.0..100.0f64)
        .prop_map(|(trades, days, complete, net_pnl, win_rate)| {
            let trades: Vec<AccountTrade> = trades
                .into_iter()
                .enumerate()
                .map(|(index, (side, pnl, mfe))| AccountTrade {
                    id: index as i64,
                    account_id: 1,
                    contract_id: "CON.F.US.ES.M26".to_string(),
                    symbol: "ES".to_string(),
                    side,
                    size: 1.0,
                    price: 5_000.0,
                    timestamp: Utc.with_ymd_and_hms(2026, 4, 1, 14, 0, 0).unwrap()
                        + Duration::minutes(index as i64),
                    fees: 2.5,
                    pnl: Some(pnl),
                    order_id: index.to_string(),
                    source_trade_id: None,
                    mfe,
                    mae: mfe.map(|value| value / 2.0),
                })
                .collect();
            let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
            let daily_pnl_days = days
                .into_iter()
                .enumerate()
                .map(|(offset, (trade_count, net_pnl))| AccountPnlCalendarDay {
                    date: start + Duration::days(offset as i64),
                    trade_count,
                    gross_pnl: net_pnl,
                    fees: 0.0,
                    net_pnl,
                })
                .collect();
            DashboardMetricsInput {
                summary: AccountSummary {
                    net_pnl,
                    win_rate,
                    avg_win: 120.0,
                    avg_loss: -80.0,
                    trade_count: trades.len() as i64,
                    profit_per_day: net_pnl / 10.0,
                    max_drawdown: -net_pnl.abs() / 3.0,
                    ..Default::default()
                },
                trades,
                daily_pnl_days,
                has_complete_directional_history: complete,
                direction_data_issue: None,
                range_start: None,
                range_end: None,
                active_hours: None,
            }
        })
}

proptest! {
    #[test]
    fn percentile_endpoints_match_extremes(values in finite_values()) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(percentile(&values, 0.0), Some(min));
        prop_assert_eq!(percentile(&values, 100.0), Some(max));
    }

    #[test]
    fn percentile_stays_within_range(values in finite_values(), p in 0.0..=100.0f64) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let result = percentile(&values, p).unwrap();
        prop_assert!(result >= min - 1e-6 && result <= max + 1e-6);
    }

    #[test]
    fn median_is_central_element_or_pair_mean(values in finite_values()) {
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mid = sorted.len() / 2;
        let expected = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        prop_assert_eq!(median(&values), Some(expected));
    }

    #[test]
    fn metric_reason_is_present_exactly_when_value_is_absent(value in any::<f64>(), reason in ".*") {
        let present = metric(value);
        prop_assert_eq!(present.value().is_some(), value.is_finite());
        prop_assert_eq!(present.missing_reason().is_some(), present.value().is_none());

        let missing = missing_metric(reason);
        prop_assert!(missing.value().is_none());
        prop_assert!(!missing.missing_reason().unwrap().trim().is_empty());
    }

    #[test]
    fn breakeven_matches_closed_form(avg_win in -1.0e4..1.0e4f64, avg_loss in 1.0..1.0e4f64) {
        let result = compute_breakeven_win_rate(avg_win, -avg_loss);
        let expected = avg_loss / (avg_win.abs() + avg_loss) * 100.0;
        prop_assert!((result.value().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn orchestrator_is_deterministic_and_honors_contract(input in snapshot()) {
        let first = compute_dashboard_derived_metrics_default(&input);
        let second = compute_dashboard_derived_metrics_default(&input);
        prop_assert_eq!(&first, &second);

        let direction = &first.direction;
        if direction.long_trades.is_missing() {
            prop_assert!(direction.insight.starts_with("N/A ("));
            prop_assert!(direction.short_expectancy.is_missing());
            prop_assert_eq!(direction.long_trades.missing_reason(), direction.short_pnl.missing_reason());
        }
        prop_assert!(first.sustainability.score >= 0.0 && first.sustainability.score <= 100.0);
    }
}

#[test]
fn breakeven_is_missing_without_average_loss() {
    let result = compute_breakeven_win_rate(0.0, 0.0);
    assert!(result.missing_reason().unwrap().contains("average win"));
    assert!(compute_breakeven_win_rate(150.0, 0.0).is_missing());
}
