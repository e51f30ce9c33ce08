//! Date Range Filter
//! Selects the rows of a transaction table that fall in an inclusive date range.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;
use tracing::trace;

use super::model::{Transaction, TransactionTable};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Inclusive `[start, end]` date range. An inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// A read-only, date-ordered selection over a [`TransactionTable`].
///
/// Holds row indices into the table rather than copies of the rows.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a TransactionTable,
    range: DateRange,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn of_table(table: &'a TransactionTable, range: DateRange) -> Self {
        let mut rows: Vec<usize> = table
            .iter()
            .enumerate()
            .filter(|(_, r)| range.contains(r.date))
            .map(|(i, _)| i)
            .collect();
        // stable: same-day rows keep file order
        rows.sort_by_key(|&i| table.records()[i].date);
        trace!(matched = rows.len(), total = table.len(), "Filtered by date range");
        Self { table, range, rows }
    }

    /// Narrow this view further. Rows stay in date order.
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> FilteredView<'a> {
        let range = DateRange::new(start, end);
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| range.contains(self.table.records()[i].date))
            .collect();
        Self {
            table: self.table,
            range,
            rows,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn table(&self) -> &'a TransactionTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of the selected rows in the underlying table.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a Transaction> + '_ {
        let records = self.table.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    /// Copy the selected rows out, in view order.
    pub fn to_records(&self) -> Vec<Transaction> {
        self.iter().copied().collect()
    }

    /// Build the data-table frame: `date, revenue, purchases, profit,
    /// turnover, sales, utilities, transport`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let days: Vec<i32> = self
            .iter()
            .map(|r| r.date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            .collect();
        let numeric = |f: fn(&Transaction) -> f64| -> Vec<f64> { self.iter().map(f).collect() };

        let date = Column::new("date".into(), days).cast(&DataType::Date)?;
        DataFrame::new(vec![
            date,
            Column::new("revenue".into(), numeric(|r| r.revenue)),
            Column::new("purchases".into(), numeric(|r| r.purchases)),
            Column::new("profit".into(), numeric(|r| r.profit)),
            Column::new("turnover".into(), numeric(|r| r.turnover)),
            Column::new("sales".into(), numeric(|r| r.sales)),
            Column::new("utilities".into(), numeric(|r| r.utilities)),
            Column::new("transport".into(), numeric(|r| r.transport)),
        ])
    }
}

/// Views compare by the rows they yield, not by which table backs them.
impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Select rows of `table` with `start <= date <= end`, ascending by date.
pub fn filter(table: &TransactionTable, start: NaiveDate, end: NaiveDate) -> FilteredView<'_> {
    table.filter(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn row(d: u32, sales: f64) -> Transaction {
        Transaction::new(day(d), sales, 0.0, 0.0, 0.0, 1.0)
    }

    fn table() -> TransactionTable {
        TransactionTable::new(vec![
            row(3, 30.0),
            row(1, 10.0),
            row(2, 20.0),
            row(3, 31.0),
            row(5, 50.0),
            row(2, 21.0),
        ])
    }

    #[test]
    fn bounds_are_inclusive() {
        let t = table();
        let view = filter(&t, day(2), day(3));
        let sales: Vec<f64> = view.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![20.0, 21.0, 30.0, 31.0]);
    }

    #[test]
    fn output_is_date_ordered_and_stable() {
        let t = table();
        let view = filter(&t, day(1), day(31));
        let sales: Vec<f64> = view.iter().map(|r| r.sales).collect();
        assert_eq!(sales, vec![10.0, 20.0, 21.0, 30.0, 31.0, 50.0]);
        assert_eq!(view.row_indices(), &[1, 2, 5, 0, 3, 4]);
    }

    #[test]
    fn every_matching_row_appears_exactly_once() {
        let t = table();
        for a in 0..=6 {
            for b in 0..=6 {
                let (start, end) = (day(a.max(1)), day(b.max(1)));
                let view = filter(&t, start, end);
                assert!(view.iter().all(|r| start <= r.date && r.date <= end));
                let expected = t.iter().filter(|r| start <= r.date && r.date <= end).count();
                assert_eq!(view.len(), expected);
                let mut idx = view.row_indices().to_vec();
                idx.sort_unstable();
                idx.dedup();
                assert_eq!(idx.len(), expected);
                assert!(view.iter().zip(view.iter().skip(1)).all(|(x, y)| x.date <= y.date));
            }
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        let t = table();
        let view = filter(&t, day(5), day(1));
        assert!(view.is_empty());
        assert!(view.range().is_inverted());
    }

    #[test]
    fn empty_table_gives_empty_view() {
        let t = TransactionTable::default();
        assert!(filter(&t, day(1), day(31)).is_empty());
    }

    #[test]
    fn refiltering_is_idempotent() {
        let t = table();
        let once = filter(&t, day(2), day(3));
        let twice = once.filter(day(2), day(3));
        assert_eq!(once, twice);
        assert_eq!(once.row_indices(), twice.row_indices());
    }

    #[test]
    fn dataframe_has_presentation_columns() {
        let t = table();
        let df = filter(&t, day(1), day(2)).to_dataframe().unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["date", "revenue", "purchases", "profit", "turnover", "sales", "utilities", "transport"]
        );
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn epoch_offset_matches_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(epoch.num_days_from_ce(), EPOCH_DAYS_FROM_CE);
    }
}
