//! Command line interface for the retail dashboard report.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

use crate::charts::ChartType;
use crate::data::{DateRange, TransactionTable};

/// File name the shop exports its daily figures to.
pub const DEFAULT_DATA_FILE: &str = "retail_shop_data.csv";

/// retail-dashboard: summarize a retail shop's daily sales CSV.
///
/// Loads the CSV, restricts it to a date range (the whole file by default), and prints the
/// headline metrics, the data behind the selected chart and the filtered rows.
#[derive(Debug, Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Path to the CSV with DATE, SALES, PURCHASES, UTILITIES, TRANSPORT and TURNOVER columns.
    #[arg(long, env = "RETAIL_DASHBOARD_DATA", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// First day to include (YYYY-MM-DD). Defaults to the earliest date in the file.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD). Defaults to the latest date in the file.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Chart to prepare: bar, line, area, scatter or pie.
    #[arg(long, default_value_t = ChartType::Bar)]
    chart: ChartType,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level for this program. Ignored when RUST_LOG is set.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn chart(&self) -> ChartType {
        self.chart
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// The requested range, with missing ends taken from the table's own bounds.
    pub fn date_range(&self, table: &TransactionTable) -> DateRange {
        let full = table.full_range();
        DateRange::new(
            self.start.unwrap_or(full.start),
            self.end.unwrap_or(full.end),
        )
    }
}
