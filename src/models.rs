use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregates for one account and time range, as served by the account summary endpoint.
///
/// Values are taken as already correct; the engine never recomputes them from trades.
/// Absent fields default to zero, which is how the dashboard renders an empty account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSummary {
    pub realized_pnl: f64,
    pub gross_pnl: f64,
    pub fees: f64,
    pub net_pnl: f64,
    /// Percent, 0..=100.
    pub win_rate: f64,
    pub win_count: i64,
    pub loss_count: i64,
    pub breakeven_count: i64,
    pub profit_factor: f64,
    /// Signed, >= 0.
    pub avg_win: f64,
    /// Signed, <= 0.
    pub avg_loss: f64,
    pub avg_win_duration_minutes: f64,
    pub avg_loss_duration_minutes: f64,
    pub expectancy_per_trade: f64,
    pub tail_risk_5pct: f64,
    /// Signed, <= 0.
    pub max_drawdown: f64,
    pub average_drawdown: f64,
    pub risk_drawdown_score: f64,
    pub max_drawdown_length_hours: f64,
    pub recovery_time_hours: f64,
    pub average_recovery_length_hours: f64,
    pub trade_count: i64,
    pub half_turn_count: i64,
    pub execution_count: i64,
    pub day_win_rate: f64,
    pub green_days: i64,
    pub red_days: i64,
    pub flat_days: i64,
    pub avg_trades_per_day: f64,
    pub active_days: i64,
    pub efficiency_per_hour: f64,
    pub profit_per_day: f64,
}

/// Execution side code of a closed trade row.
///
/// Feeds send free-form strings ("BUY", "sell", sometimes "LONG"/"SHORT"); they are
/// mapped once here and never compared as strings again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionSide {
    Buy,
    Sell,
    Long,
    Short,
    Unknown,
}

impl ExecutionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionSide::Buy => "BUY",
            ExecutionSide::Sell => "SELL",
            ExecutionSide::Long => "LONG",
            ExecutionSide::Short => "SHORT",
            ExecutionSide::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "BUY" => ExecutionSide::Buy,
            "SELL" => ExecutionSide::Sell,
            "LONG" => ExecutionSide::Long,
            "SHORT" => ExecutionSide::Short,
            _ => ExecutionSide::Unknown,
        }
    }
}

impl FromStr for ExecutionSide {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ExecutionSide::parse(s))
    }
}

impl From<String> for ExecutionSide {
    fn from(value: String) -> Self {
        ExecutionSide::parse(&value)
    }
}

impl From<ExecutionSide> for String {
    fn from(value: ExecutionSide) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExecutionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One closed execution. Direction is not stored; see [`crate::direction::infer_direction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTrade {
    pub id: i64,
    #[serde(default)]
    pub account_id: i64,
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub symbol: String,
    pub side: ExecutionSide,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub fees: f64,
    pub pnl: Option<f64>,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub source_trade_id: Option<String>,
    #[serde(default)]
    pub mfe: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
}

/// Net P&L for one account-local trading day, already grouped upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountPnlCalendarDay {
    pub date: NaiveDate,
    pub trade_count: i64,
    #[serde(default)]
    pub gross_pnl: f64,
    #[serde(default)]
    pub fees: f64,
    pub net_pnl: f64,
}

/// Everything the orchestrator needs for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetricsInput {
    pub summary: AccountSummary,
    #[serde(default)]
    pub trades: Vec<AccountTrade>,
    #[serde(default)]
    pub daily_pnl_days: Vec<AccountPnlCalendarDay>,
    #[serde(default)]
    pub has_complete_directional_history: bool,
    #[serde(default)]
    pub direction_data_issue: Option<String>,
    #[serde(default)]
    pub range_start: Option<String>,
    #[serde(default)]
    pub range_end: Option<String>,
    #[serde(default)]
    pub active_hours: Option<f64>,
}

impl DashboardMetricsInput {
    /// Caller-reported data issue, ignoring blank strings.
    pub fn direction_issue(&self) -> Option<&str> {
        self.direction_data_issue
            .as_deref()
            .map(str::trim)
            .filter(|issue| !issue.is_empty())
    }
}
