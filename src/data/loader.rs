//! CSV Data Loader Module
//! Reads the shop's CSV with Polars and turns it into typed transaction rows.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, trace};

use super::model::{SourceRecord, TransactionTable};
use super::processor::DataProcessor;

pub const DATE_COLUMN: &str = "DATE";
pub const SALES_COLUMN: &str = "SALES";
pub const PURCHASES_COLUMN: &str = "PURCHASES";
pub const UTILITIES_COLUMN: &str = "UTILITIES";
pub const TRANSPORT_COLUMN: &str = "TRANSPORT";
pub const TURNOVER_COLUMN: &str = "TURNOVER";

/// Columns that must be present in the header, case-sensitive.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    DATE_COLUMN,
    SALES_COLUMN,
    PURCHASES_COLUMN,
    UTILITIES_COLUMN,
    TRANSPORT_COLUMN,
    TURNOVER_COLUMN,
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Failed to read data file: {0}")]
    Io(#[from] io::Error),
}

impl From<PolarsError> for LoadError {
    fn from(err: PolarsError) -> Self {
        LoadError::MalformedInput(err.to_string())
    }
}

impl LoadError {
    /// Map an I/O error for `path`, keeping a missing file distinct from other failures.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io(err),
        }
    }
}

/// Parse a calendar date the way the source data writes it.
///
/// Date-times are accepted and truncated to the day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Read and parse a CSV file, bypassing the cache.
///
/// Any bad row fails the whole load.
pub fn load_uncached(path: &Path) -> Result<TransactionTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    let table = parse_csv(bytes)?;
    info!(path = %path.display(), rows = table.len(), "Loaded transaction table");
    Ok(table)
}

/// Parse CSV content that is already in memory.
pub fn parse_csv(bytes: Vec<u8>) -> Result<TransactionTable, LoadError> {
    // every column comes in as a string; typing happens in the cast below
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.get_column_index(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MalformedInput(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let typed = df
        .lazy()
        .select([
            col(DATE_COLUMN).cast(DataType::String),
            col(SALES_COLUMN).cast(DataType::Float64),
            col(PURCHASES_COLUMN).cast(DataType::Float64),
            col(UTILITIES_COLUMN).cast(DataType::Float64),
            col(TRANSPORT_COLUMN).cast(DataType::Float64),
            col(TURNOVER_COLUMN).cast(DataType::Float64),
        ])
        .collect()?;
    trace!(rows = typed.height(), "CSV parsed");

    let dates = date_values(&typed)?;
    let sales = numeric_values(&typed, SALES_COLUMN)?;
    let purchases = numeric_values(&typed, PURCHASES_COLUMN)?;
    let utilities = numeric_values(&typed, UTILITIES_COLUMN)?;
    let transport = numeric_values(&typed, TRANSPORT_COLUMN)?;
    let turnover = numeric_values(&typed, TURNOVER_COLUMN)?;

    let records: Vec<SourceRecord> = (0..typed.height())
        .map(|i| SourceRecord {
            date: dates[i],
            sales: sales[i],
            purchases: purchases[i],
            utilities: utilities[i],
            transport: transport[i],
            turnover: turnover[i],
        })
        .collect();

    Ok(DataProcessor::enrich(&records))
}

fn date_values(df: &DataFrame) -> Result<Vec<NaiveDate>, LoadError> {
    let column = df.column(DATE_COLUMN)?;
    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let raw = value.ok_or_else(|| empty_cell(DATE_COLUMN, i))?;
            parse_date(raw).ok_or_else(|| {
                LoadError::MalformedInput(format!(
                    "unparseable {DATE_COLUMN} {raw:?} on data row {}",
                    i + 1
                ))
            })
        })
        .collect()
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, LoadError> {
    df.column(name)?
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, value)| value.ok_or_else(|| empty_cell(name, i)))
        .collect()
}

fn empty_cell(name: &str, index: usize) -> LoadError {
    LoadError::MalformedInput(format!(
        "empty or non-numeric {name} on data row {}",
        index + 1
    ))
}
