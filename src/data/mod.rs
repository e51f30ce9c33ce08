//! Data module - CSV loading, enrichment, caching and date filtering

mod cache;
mod filter;
mod loader;
mod model;
mod processor;

pub use cache::{clear_cache, global_cache, invalidate, load, TableCache};
pub use filter::{filter, DateRange, FilteredView};
pub use loader::{load_uncached, parse_csv, parse_date, LoadError, REQUIRED_COLUMNS};
pub use model::{SourceRecord, Transaction, TransactionTable};
pub use processor::{enrich, DataProcessor};
