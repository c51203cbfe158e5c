use crate::commands::render_json;
use crate::config::InsightThresholds;
use crate::dashboard::compute_dashboard_derived_metrics;
use crate::snapshot::load_snapshot;
use anyhow::Result;
use log::info;
use std::path::Path;

pub fn run(snapshot_path: &Path, thresholds: &InsightThresholds, pretty: bool) -> Result<()> {
    info!("Computing activity metrics for {}", snapshot_path.display());
    let input = load_snapshot(snapshot_path)?;
    let metrics = compute_dashboard_derived_metrics(&input, thresholds);
    println!("{}", render_json(&metrics.activity, pretty)?);
    Ok(())
}
