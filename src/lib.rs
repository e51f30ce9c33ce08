//! Retail Dashboard - load, filter and summarize a retail shop's daily figures
//!
//! The pipeline is `load` (cached per path) → `filter` by an inclusive date range →
//! `summarize`. Chart data and a printable report are built on top of the filtered view.

pub mod args;
pub mod charts;
pub mod data;
pub mod report;
pub mod stats;

pub use charts::{ChartData, ChartType};
pub use data::{
    clear_cache, enrich, filter, invalidate, load, DateRange, FilteredView, LoadError,
    TableCache, Transaction, TransactionTable,
};
pub use report::Report;
pub use stats::{summarize, Summary};
