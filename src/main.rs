use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard_metrics::{
    commands::{activity, batch, compute, sustainability},
    config::InsightThresholds,
    sustainability::SustainabilityInputs,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dashboard-metrics")]
#[command(about = "Derived trading metrics for account dashboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full derived metrics bundle for one snapshot
    Compute {
        /// Path to a dashboard snapshot JSON file
        snapshot: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Compute derived metrics for several snapshots, one JSON line per file
    Batch {
        #[arg(required = true, num_args = 1..)]
        snapshots: Vec<PathBuf>,
    },
    /// Score P&L sustainability from summary figures
    Sustainability {
        #[arg(long, allow_hyphen_values = true)]
        net_pnl: f64,
        #[arg(long, allow_hyphen_values = true)]
        profit_per_day: f64,
        /// Signed, usually <= 0
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        max_drawdown: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        best_day: f64,
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        worst_day: f64,
        /// Population standard deviation of daily net P&L
        #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
        volatility: f64,
        #[arg(long)]
        pretty: bool,
    },
    /// Print trading cadence metrics for one snapshot
    Activity {
        snapshot: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv_result = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = dotenv_result {
        if !err.not_found() {
            warn!(".env not loaded: {err}");
        }
    }

    let thresholds = InsightThresholds::from_settings_map(&InsightThresholds::settings_from_env())?;
    if thresholds != InsightThresholds::default() {
        info!("Using insight thresholds {:?}", thresholds);
    }

    match cli.command {
        Commands::Compute { snapshot, pretty } => {
            compute::run(&snapshot, &thresholds, pretty)?;
        }
        Commands::Batch { snapshots } => {
            batch::run(&snapshots, &thresholds)?;
        }
        Commands::Sustainability {
            net_pnl,
            profit_per_day,
            max_drawdown,
            best_day,
            worst_day,
            volatility,
            pretty,
        } => {
            let inputs = SustainabilityInputs {
                net_pnl,
                profit_per_day,
                max_drawdown,
                best_day,
                worst_day,
                daily_pnl_volatility: volatility,
            };
            sustainability::run(&inputs, pretty)?;
        }
        Commands::Activity { snapshot, pretty } => {
            activity::run(&snapshot, &thresholds, pretty)?;
        }
    }

    Ok(())
}
