//! Charts module - data preparation for the chart picker

mod series;

pub use series::{
    expense_breakdown, scatter_points, time_series, ChartData, ChartType, ChartTypeError,
    ExpenseShare, ScatterPoint, TimePoint,
};
