//! Statistics Calculator Module
//! Descriptive statistics for each daily metric over a filtered view.

use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

use crate::data::{FilteredView, Transaction};

/// A per-row figure that can be described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Sales,
    Purchases,
    Utilities,
    Transport,
    Turnover,
    Profit,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Sales,
        Metric::Purchases,
        Metric::Utilities,
        Metric::Transport,
        Metric::Turnover,
        Metric::Profit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Sales => "SALES",
            Metric::Purchases => "PURCHASES",
            Metric::Utilities => "UTILITIES",
            Metric::Transport => "TRANSPORT",
            Metric::Turnover => "TURNOVER",
            Metric::Profit => "PROFIT",
        }
    }

    pub fn value(&self, row: &Transaction) -> f64 {
        match self {
            Metric::Sales => row.sales,
            Metric::Purchases => row.purchases,
            Metric::Utilities => row.utilities,
            Metric::Transport => row.transport,
            Metric::Turnover => row.turnover,
            Metric::Profit => row.profit,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistics for one metric. Every figure is `None` when there are no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStats {
    pub metric: Metric,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub p05: Option<f64>,
    pub p95: Option<f64>,
}

impl MetricStats {
    fn empty(metric: Metric) -> Self {
        Self {
            metric,
            count: 0,
            mean: None,
            median: None,
            std: None,
            p05: None,
            p95: None,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(metric: Metric, values: &[f64]) -> MetricStats {
        let n = values.len();
        if n == 0 {
            return MetricStats::empty(metric);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().mean();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        // sample standard deviation is undefined for one value; report no spread
        let std = if n > 1 { values.iter().std_dev() } else { 0.0 };

        MetricStats {
            metric,
            count: n,
            mean: Some(mean),
            median: Some(median),
            std: Some(std),
            p05: Some(Self::percentile(&sorted, 5.0)),
            p95: Some(Self::percentile(&sorted, 95.0)),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Describe one metric over the rows of `view`.
    pub fn describe_metric(view: &FilteredView<'_>, metric: Metric) -> MetricStats {
        let values: Vec<f64> = view.iter().map(|row| metric.value(row)).collect();
        Self::compute_descriptive_stats(metric, &values)
    }

    /// Describe every metric, in [`Metric::ALL`] order, computing them in parallel.
    pub fn describe(view: &FilteredView<'_>) -> Vec<MetricStats> {
        Metric::ALL
            .par_iter()
            .map(|&metric| Self::describe_metric(view, metric))
            .collect()
    }
}
