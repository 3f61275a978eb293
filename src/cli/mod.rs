//! Command-line parsing for the e-commerce dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the loading/aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "E-commerce sales dashboard over pre-aggregated CSV extracts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Print KPIs, charts-as-tables and segments to stdout.
    Report(ReportArgs),
    /// Write the computed dashboard view to JSON and/or the trend series to CSV.
    Export(ExportArgs),
}

/// Where the four extracts live, plus the initial date range.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory holding the four CSV extracts.
    #[arg(long, env = "DASH_DATA_DIR", default_value = "../data")]
    pub data_dir: PathBuf,

    /// Per-transaction extract (defaults to `<data-dir>/final_dataset.csv`).
    #[arg(long = "final", value_name = "CSV")]
    pub final_csv: Option<PathBuf>,

    /// Monthly extract (defaults to `<data-dir>/monthly_aggregation.csv`).
    #[arg(long = "monthly", value_name = "CSV")]
    pub monthly_csv: Option<PathBuf>,

    /// Weekly extract (defaults to `<data-dir>/weekly_aggregation.csv`).
    #[arg(long = "weekly", value_name = "CSV")]
    pub weekly_csv: Option<PathBuf>,

    /// Daily extract (defaults to `<data-dir>/daily_aggregation.csv`).
    #[arg(long = "daily", value_name = "CSV")]
    pub daily_csv: Option<PathBuf>,

    /// Start of the sales-trend range (YYYY-MM-DD). Defaults to the first transaction date.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the sales-trend range (YYYY-MM-DD). Defaults to the last transaction date.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Log file (the terminal is taken over by the UI).
    #[arg(long, default_value = "dash.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Render ASCII charts for the trend and period series.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Customer id for the lookup table (requires `--country`).
    #[arg(long, requires = "country")]
    pub customer: Option<String>,

    /// Country for the lookup table (requires `--customer`).
    #[arg(long, requires = "customer")]
    pub country: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write the full dashboard view as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Write the sales-trend series as CSV.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,
}
