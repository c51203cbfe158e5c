pub mod activity;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod direction;
pub mod metric;
pub mod models;
pub mod payoff;
pub mod ratios;
pub mod snapshot;
pub mod stability;
pub mod stats;
pub mod sustainability;
pub mod swing;

pub use dashboard::{
    compute_dashboard_derived_metrics, compute_dashboard_derived_metrics_default,
    DashboardDerivedMetrics,
};
pub use metric::{metric, missing_metric, MetricValue};
