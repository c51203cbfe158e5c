use crate::config::InsightThresholds;
use crate::dashboard::{compute_dashboard_derived_metrics, DashboardDerivedMetrics};
use crate::snapshot::load_snapshot;
use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One output line per snapshot file.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchLine {
    Metrics {
        file: String,
        metrics: Box<DashboardDerivedMetrics>,
    },
    Error {
        file: String,
        error: String,
    },
}

impl BatchLine {
    pub fn is_error(&self) -> bool {
        matches!(self, BatchLine::Error { .. })
    }
}

/// Evaluates every snapshot in parallel; the result keeps input order.
pub fn evaluate_snapshots(paths: &[PathBuf], thresholds: &InsightThresholds) -> Vec<BatchLine> {
    paths
        .par_iter()
        .map(|path| evaluate_snapshot(path, thresholds))
        .collect()
}

fn evaluate_snapshot(path: &Path, thresholds: &InsightThresholds) -> BatchLine {
    let file = path.display().to_string();
    match load_snapshot(path) {
        Ok(input) => BatchLine::Metrics {
            file,
            metrics: Box::new(compute_dashboard_derived_metrics(&input, thresholds)),
        },
        Err(err) => {
            warn!("Skipping snapshot: {}", err);
            BatchLine::Error {
                file,
                error: err.to_string(),
            }
        }
    }
}

pub fn run(paths: &[PathBuf], thresholds: &InsightThresholds) -> Result<()> {
    info!("Evaluating {} snapshot(s)", paths.len());
    let lines = evaluate_snapshots(paths, thresholds);
    let failures = lines.iter().filter(|line| line.is_error()).count();

    for line in &lines {
        println!("{}", serde_json::to_string(line)?);
    }

    if failures > 0 {
        warn!("{} of {} snapshot(s) failed", failures, lines.len());
    } else {
        info!("All {} snapshot(s) evaluated", lines.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_files_become_error_lines_in_order() {
        let paths = vec![
            PathBuf::from("/nonexistent/first.json"),
            PathBuf::from("/nonexistent/second.json"),
        ];
        let lines = evaluate_snapshots(&paths, &InsightThresholds::default());

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(BatchLine::is_error));
        let rendered: Vec<serde_json::Value> = lines
            .iter()
            .map(|line| serde_json::to_value(line).unwrap())
            .collect();
        assert_eq!(rendered[0]["file"], "/nonexistent/first.json");
        assert_eq!(rendered[1]["file"], "/nonexistent/second.json");
        assert!(rendered[0]["error"]
            .as_str()
            .unwrap()
            .contains("failed to read snapshot"));
        assert!(rendered[0].get("metrics").is_none());
    }
}
