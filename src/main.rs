//! Retail Dashboard - prints the summary metrics, chart data and rows for a date range.

use anyhow::Context;
use clap::Parser;
use retail_dashboard::args::{Args, OutputFormat};
use retail_dashboard::Report;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level());
    debug!("Log level set to {}", args.log_level());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let table = retail_dashboard::load(args.data())
        .with_context(|| format!("Failed to load {}", args.data().display()))?;

    let range = args.date_range(&table);
    debug!(start = %range.start, end = %range.end, chart = %args.chart(), "Building report");
    let report = Report::build(&table, range, args.chart());

    match args.format() {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // bin and lib share the crate name
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
