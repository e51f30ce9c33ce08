//! Transaction Model
//! One row of the shop's daily figures and the loaded table holding them.

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::{DateRange, FilteredView};

/// A row exactly as it appears in the source CSV, before derived columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRecord {
    pub date: NaiveDate,
    pub sales: f64,
    pub purchases: f64,
    pub utilities: f64,
    pub transport: f64,
    pub turnover: f64,
}

/// A transaction record with its derived `profit` and `revenue` columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub revenue: f64,
    pub purchases: f64,
    pub profit: f64,
    pub turnover: f64,
    pub sales: f64,
    pub utilities: f64,
    pub transport: f64,
}

impl Transaction {
    /// Build an enriched record straight from the source figures.
    pub fn new(
        date: NaiveDate,
        sales: f64,
        purchases: f64,
        utilities: f64,
        transport: f64,
        turnover: f64,
    ) -> Self {
        Self::from_source(SourceRecord {
            date,
            sales,
            purchases,
            utilities,
            transport,
            turnover,
        })
    }

    /// Compute the derived columns for one source row.
    ///
    /// Profit is not clamped: a loss-making day stays negative.
    pub fn from_source(record: SourceRecord) -> Self {
        let profit = record.sales - (record.purchases + record.utilities + record.transport);
        Self {
            date: record.date,
            revenue: record.sales,
            purchases: record.purchases,
            profit,
            turnover: record.turnover,
            sales: record.sales,
            utilities: record.utilities,
            transport: record.transport,
        }
    }

    /// Total of the three expense columns.
    pub fn expenses(&self) -> f64 {
        self.purchases + self.utilities + self.transport
    }
}

/// The loaded transaction table, in file order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    records: Vec<Transaction>,
}

impl TransactionTable {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    /// Earliest and latest date in the table, `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }

    /// The full span of the table, or an unbounded range when there is no data.
    pub fn full_range(&self) -> DateRange {
        match self.date_bounds() {
            Some((start, end)) => DateRange::new(start, end),
            None => DateRange::new(NaiveDate::MIN, NaiveDate::MAX),
        }
    }

    /// Select the rows with `start <= date <= end`, ordered by date.
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> FilteredView<'_> {
        FilteredView::of_table(self, DateRange::new(start, end))
    }
}

impl<'a> IntoIterator for &'a TransactionTable {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn profit_subtracts_all_expenses() {
        let t = Transaction::new(day(1), 1000.0, 400.0, 50.0, 30.0, 10.0);
        assert_eq!(t.profit, 520.0);
        assert_eq!(t.revenue, 1000.0);
        assert_eq!(t.expenses(), 480.0);
    }

    #[test]
    fn profit_can_be_negative() {
        let t = Transaction::new(day(1), 100.0, 400.0, 50.0, 30.0, 2.0);
        assert_eq!(t.profit, -380.0);
    }

    #[test]
    fn date_bounds_ignore_file_order() {
        let table = TransactionTable::new(vec![
            Transaction::new(day(5), 1.0, 0.0, 0.0, 0.0, 1.0),
            Transaction::new(day(2), 1.0, 0.0, 0.0, 0.0, 1.0),
            Transaction::new(day(9), 1.0, 0.0, 0.0, 0.0, 1.0),
        ]);
        assert_eq!(table.date_bounds(), Some((day(2), day(9))));
        assert_eq!(TransactionTable::default().date_bounds(), None);
    }
}
