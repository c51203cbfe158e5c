use crate::models::DashboardMetricsInput;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    pub fn path(&self) -> &Path {
        match self {
            SnapshotError::Io { path, .. } | SnapshotError::Parse { path, .. } => path,
        }
    }
}

/// Reads a dashboard snapshot (summary, trades, daily series) from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<DashboardMetricsInput, SnapshotError> {
    let contents = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&contents).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_snapshot(contents: &str) -> Result<DashboardMetricsInput, serde_json::Error> {
    serde_json::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionSide;

    const SNAPSHOT: &str = r#"{
        "summary": { "net_pnl": 120.5, "trade_count": 2, "win_rate": 50.0 },
        "trades": [
            { "id": 1, "side": "SELL", "timestamp": "2026-01-05T15:30:00Z", "pnl": 200.0 },
            { "id": 2, "side": "buy", "timestamp": "2026-01-05T16:10:00Z", "pnl": -79.5, "mfe": 12.0 }
        ],
        "dailyPnlDays": [
            { "date": "2026-01-05", "trade_count": 2, "net_pnl": 120.5 }
        ],
        "hasCompleteDirectionalHistory": true,
        "directionDataIssue": null,
        "rangeStart": "2026-01-05T00:00:00Z"
    }"#;

    #[test]
    fn parses_camel_case_snapshot() {
        let input = parse_snapshot(SNAPSHOT).unwrap();
        assert_eq!(input.summary.trade_count, 2);
        assert!((input.summary.net_pnl - 120.5).abs() < 1e-9);
        assert_eq!(input.trades[0].side, ExecutionSide::Sell);
        assert_eq!(input.trades[1].side, ExecutionSide::Buy);
        assert_eq!(input.trades[1].mfe, Some(12.0));
        assert_eq!(input.daily_pnl_days.len(), 1);
        assert!(input.has_complete_directional_history);
        assert_eq!(input.direction_issue(), None);
        assert_eq!(input.range_start.as_deref(), Some("2026-01-05T00:00:00Z"));
        assert_eq!(input.range_end, None);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/dashboard-snapshot.json");
        let err = load_snapshot(path).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert_eq!(err.path(), path);
        assert!(err.to_string().contains("dashboard-snapshot.json"));
    }
}
