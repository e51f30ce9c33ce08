//! Data Processor Module
//! Adds the derived columns (profit, revenue) to freshly parsed rows.

use super::model::{SourceRecord, Transaction, TransactionTable};

/// Handles the derived-column step of the load pipeline.
pub struct DataProcessor;

impl DataProcessor {
    /// Compute `profit = sales - (purchases + utilities + transport)` and
    /// `revenue = sales` for every row, keeping file order.
    ///
    /// Negative inputs are passed through as-is.
    pub fn enrich(records: &[SourceRecord]) -> TransactionTable {
        TransactionTable::new(records.iter().copied().map(Transaction::from_source).collect())
    }
}

/// Shorthand for [`DataProcessor::enrich`].
pub fn enrich(records: &[SourceRecord]) -> TransactionTable {
    DataProcessor::enrich(records)
}
