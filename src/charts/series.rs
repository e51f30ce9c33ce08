//! Chart Series Module
//! Prepares the data behind each chart type. Drawing is left to the front end.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::data::FilteredView;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown chart type {0:?}, expected one of: bar, line, area, scatter, pie")]
pub struct ChartTypeError(pub String);

/// The chart picker choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Area,
    Scatter,
    Pie,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Scatter,
        ChartType::Pie,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Area => "Area",
            ChartType::Scatter => "Scatter",
            ChartType::Pie => "Pie",
        }
    }

    pub fn title(&self) -> String {
        match self {
            ChartType::Scatter => "Scatter Plot: Purchases vs Profit".to_string(),
            ChartType::Pie => "Pie Chart: Total Expense Distribution".to_string(),
            other => format!("{} Chart: Sales, Purchases, and Profit Over Time", other.name()),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = ChartTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ChartTypeError(s.to_string()))
    }
}

/// One x-position on the revenue/purchases/profit time chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub purchases: f64,
    pub profit: f64,
}

/// Purchases against profit, with the hover fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub purchases: f64,
    pub profit: f64,
    pub date: NaiveDate,
    pub revenue: f64,
    pub turnover: f64,
}

/// A pie slice of the expense breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseShare {
    pub category: &'static str,
    pub amount: f64,
}

/// Everything a front end needs to draw the selected chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    TimeSeries {
        chart: ChartType,
        points: Vec<TimePoint>,
    },
    Scatter {
        points: Vec<ScatterPoint>,
    },
    Pie {
        slices: Vec<ExpenseShare>,
    },
    /// Scatter and pie have nothing to show for an empty period.
    NoData {
        chart: ChartType,
    },
}

impl ChartData {
    pub fn for_view(chart: ChartType, view: &FilteredView<'_>) -> Self {
        match chart {
            ChartType::Bar | ChartType::Line | ChartType::Area => ChartData::TimeSeries {
                chart,
                points: time_series(view),
            },
            ChartType::Scatter => match scatter_points(view) {
                Some(points) => ChartData::Scatter { points },
                None => ChartData::NoData { chart },
            },
            ChartType::Pie => match expense_breakdown(view) {
                Some(slices) => ChartData::Pie { slices },
                None => ChartData::NoData { chart },
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::TimeSeries { points, .. } => points.is_empty(),
            ChartData::Scatter { points } => points.is_empty(),
            ChartData::Pie { slices } => slices.is_empty(),
            ChartData::NoData { .. } => true,
        }
    }
}

/// Revenue, purchases and profit per row, in view order.
pub fn time_series(view: &FilteredView<'_>) -> Vec<TimePoint> {
    view.iter()
        .map(|r| TimePoint {
            date: r.date,
            revenue: r.revenue,
            purchases: r.purchases,
            profit: r.profit,
        })
        .collect()
}

/// Purchases vs profit points, `None` when the view is empty.
pub fn scatter_points(view: &FilteredView<'_>) -> Option<Vec<ScatterPoint>> {
    if view.is_empty() {
        return None;
    }
    Some(
        view.iter()
            .map(|r| ScatterPoint {
                purchases: r.purchases,
                profit: r.profit,
                date: r.date,
                revenue: r.revenue,
                turnover: r.turnover,
            })
            .collect(),
    )
}

/// Total purchases, utilities and transport over the view, `None` when empty.
pub fn expense_breakdown(view: &FilteredView<'_>) -> Option<Vec<ExpenseShare>> {
    if view.is_empty() {
        return None;
    }
    let (purchases, utilities, transport) = view.iter().fold((0.0, 0.0, 0.0), |acc, r| {
        (acc.0 + r.purchases, acc.1 + r.utilities, acc.2 + r.transport)
    });
    Some(vec![
        ExpenseShare {
            category: "PURCHASES",
            amount: purchases,
        },
        ExpenseShare {
            category: "UTILITIES",
            amount: utilities,
        },
        ExpenseShare {
            category: "TRANSPORT",
            amount: transport,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{filter, Transaction, TransactionTable};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn shop() -> TransactionTable {
        TransactionTable::new(vec![
            Transaction::new(day(2), 800.0, 300.0, 40.0, 20.0, 8.0),
            Transaction::new(day(1), 1000.0, 400.0, 50.0, 30.0, 10.0),
        ])
    }

    #[test]
    fn chart_type_parses_case_insensitively() {
        assert_eq!("pie".parse::<ChartType>(), Ok(ChartType::Pie));
        assert_eq!(" Scatter ".parse::<ChartType>(), Ok(ChartType::Scatter));
        assert_eq!("AREA".parse::<ChartType>(), Ok(ChartType::Area));
        assert!("donut".parse::<ChartType>().is_err());
        for t in ChartType::ALL {
            assert_eq!(t.to_string().parse::<ChartType>(), Ok(t));
        }
    }

    #[test]
    fn time_series_follows_view_order() {
        let table = shop();
        let points = time_series(&filter(&table, day(1), day(2)));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, day(1));
        assert_eq!(points[0].profit, 520.0);
        assert_eq!(points[1].revenue, 800.0);
    }

    #[test]
    fn expense_breakdown_sums_each_category() {
        let table = shop();
        let slices = expense_breakdown(&filter(&table, day(1), day(2))).unwrap();
        let amounts: Vec<(&str, f64)> = slices.iter().map(|s| (s.category, s.amount)).collect();
        assert_eq!(
            amounts,
            vec![("PURCHASES", 700.0), ("UTILITIES", 90.0), ("TRANSPORT", 50.0)]
        );
    }

    #[test]
    fn empty_period_has_no_scatter_or_pie() {
        let table = shop();
        let view = filter(&table, day(10), day(20));
        assert_eq!(
            ChartData::for_view(ChartType::Pie, &view),
            ChartData::NoData { chart: ChartType::Pie }
        );
        assert_eq!(
            ChartData::for_view(ChartType::Scatter, &view),
            ChartData::NoData { chart: ChartType::Scatter }
        );
        let line = ChartData::for_view(ChartType::Line, &view);
        assert!(matches!(line, ChartData::TimeSeries { chart: ChartType::Line, .. }));
        assert!(line.is_empty());
    }

    #[test]
    fn chart_data_serializes_with_kind_tag() {
        let table = shop();
        let data = ChartData::for_view(ChartType::Pie, &filter(&table, day(1), day(1)));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["kind"], "pie");
        assert_eq!(json["slices"][0]["amount"], 400.0);
    }
}
