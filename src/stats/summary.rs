//! Summary Metrics
//! The four headline numbers shown above the charts.

use serde::Serialize;

use crate::data::FilteredView;

/// Aggregates over a filtered view.
///
/// Sums default to zero on an empty view. `avg_turnover` is `None` there:
/// a mean over no rows is undefined and must not be shown as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_purchases: f64,
    pub total_profit: f64,
    pub avg_turnover: Option<f64>,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.avg_turnover.is_some()
    }
}

/// Compute totals and the average turnover for `view`.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let mut total_revenue = 0.0;
    let mut total_purchases = 0.0;
    let mut total_profit = 0.0;
    let mut turnover = 0.0;

    for row in view.iter() {
        total_revenue += row.revenue;
        total_purchases += row.purchases;
        total_profit += row.profit;
        turnover += row.turnover;
    }

    let avg_turnover = match view.len() {
        0 => None,
        n => Some(turnover / n as f64),
    };

    Summary {
        total_revenue,
        total_purchases,
        total_profit,
        avg_turnover,
    }
}
