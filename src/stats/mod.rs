//! Stats module - summary metrics and descriptive statistics

mod calculator;
mod summary;

pub use calculator::{Metric, MetricStats, StatsCalculator};
pub use summary::{summarize, Summary};
