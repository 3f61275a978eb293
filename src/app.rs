//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - loads the four extracts
//! - dispatches to the TUI, the text report, or the exporter

use std::fs::File;
use std::path::Path;

use clap::Parser;
use env_logger::{Env, Target};
use log::info;

use crate::cli::{Command, ExportArgs, ReportArgs, TuiArgs};
use crate::config::{load_dotenv, DataPaths};
use crate::error::AppError;

pub mod pipeline;

use pipeline::Dashboard;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    load_dotenv();

    // `dash` and `dash --data-dir X` behave like `dash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    init_logging(Some(&args.log_file))?;
    crate::tui::run(args)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    init_logging(None)?;
    let dashboard = Dashboard::load(&DataPaths::from_args(&args.data))?;
    let range = dashboard.resolve_range(args.data.from, args.data.to)?;
    let view = dashboard.view(range);

    println!("{}", crate::report::format_ingest_summary(&dashboard.ingest_stats()));
    println!("{}", crate::report::format_report(&view));

    if args.plot {
        let charts = [
            crate::plot::render_line_chart("Sales Over Time", &view.trend, args.width, args.height),
            crate::plot::render_bar_chart("Monthly Sales", &view.monthly, args.width, args.height),
            crate::plot::render_bar_chart("Weekly Sales", &view.weekly, args.width, args.height),
            crate::plot::render_bar_chart("Daily Sales", &view.daily, args.width, args.height),
        ];
        for chart in charts {
            println!("{chart}");
        }
    }

    if let (Some(customer), Some(country)) = (&args.customer, &args.country) {
        let rows = dashboard.lookup(customer, country);
        println!("{}", crate::report::format_lookup(customer, country, &rows));
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    init_logging(None)?;
    if args.json.is_none() && args.csv.is_none() {
        return Err(AppError::new(2, "Nothing to export: pass --json and/or --csv."));
    }

    let dashboard = Dashboard::load(&DataPaths::from_args(&args.data))?;
    let range = dashboard.resolve_range(args.data.from, args.data.to)?;
    let view = dashboard.view(range);

    if let Some(path) = &args.json {
        crate::io::export::write_view_json(path, &view)?;
        info!("Wrote dashboard view to {}", path.display());
    }
    if let Some(path) = &args.csv {
        crate::io::export::write_trend_csv(path, &view.trend)?;
        info!("Wrote {} trend points to {}", view.trend.len(), path.display());
    }
    Ok(())
}

/// Initialize `env_logger` (`RUST_LOG` wins over the `info` default).
///
/// With a log file, output goes there instead of stderr so it does not
/// interleave with the alternate screen.
fn init_logging(log_file: Option<&Path>) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    // A logger may already be installed (e.g. by a test harness).
    let _ = builder.try_init();
    Ok(())
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                        -> `dash tui`
/// - `dash --data-dir X ...`       -> `dash tui --data-dir X ...`
/// - `dash --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
