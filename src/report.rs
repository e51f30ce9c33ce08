//! Dashboard Report
//! Bundles one date range's summary, chart data and rows for a front end.

use serde::Serialize;
use std::fmt::Write;

use crate::charts::{ChartData, ChartType};
use crate::data::{DateRange, Transaction, TransactionTable};
use crate::stats::{summarize, MetricStats, StatsCalculator, Summary};

pub const CURRENCY: &str = "UGX";
pub const NO_DATA: &str = "No data";

/// A labelled headline figure, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// Format a money amount with thousands separators and no decimals.
pub fn format_currency(amount: f64) -> String {
    format!("{} {CURRENCY}", format_num::format_num!(",.0f", amount))
}

/// Format the average turnover, keeping the empty case visible.
pub fn format_turnover(avg: Option<f64>) -> String {
    match avg {
        Some(value) => format!("{value:.1} Items"),
        None => NO_DATA.to_string(),
    }
}

impl Summary {
    pub fn metric_cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard {
                label: "Total Revenue",
                value: format_currency(self.total_revenue),
            },
            MetricCard {
                label: "Total Purchases",
                value: format_currency(self.total_purchases),
            },
            MetricCard {
                label: "Total Profit",
                value: format_currency(self.total_profit),
            },
            MetricCard {
                label: "Avg Turnover",
                value: format_turnover(self.avg_turnover),
            },
        ]
    }
}

/// Everything shown for one date range and chart selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub summary: Summary,
    pub cards: Vec<MetricCard>,
    pub chart: ChartData,
    pub stats: Vec<MetricStats>,
    pub rows: Vec<Transaction>,
}

impl Report {
    pub fn build(table: &TransactionTable, range: DateRange, chart: ChartType) -> Self {
        let view = table.filter(range.start, range.end);
        let summary = summarize(&view);
        Self {
            range,
            summary,
            cards: summary.metric_cards(),
            chart: ChartData::for_view(chart, &view),
            stats: StatsCalculator::describe(&view),
            rows: view.to_records(),
        }
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Retail Shop Performance Dashboard");
        let _ = writeln!(out, "Period: {} to {}", self.range.start, self.range.end);
        let _ = writeln!(out);

        let _ = writeln!(out, "Summary Over Selected Period");
        for card in &self.cards {
            let _ = writeln!(out, "  {:<16} {}", card.label, card.value);
        }
        let _ = writeln!(out);

        self.render_chart(&mut out);
        let _ = writeln!(out);

        let _ = writeln!(out, "Data Table (Filtered Period)");
        let _ = writeln!(
            out,
            "  {:<10} {:>12} {:>12} {:>12} {:>9} {:>12} {:>10} {:>10}",
            "DATE", "REVENUE", "PURCHASES", "PROFIT", "TURNOVER", "SALES", "UTILITIES", "TRANSPORT"
        );
        for r in &self.rows {
            let _ = writeln!(
                out,
                "  {:<10} {:>12} {:>12} {:>12} {:>9} {:>12} {:>10} {:>10}",
                r.date, r.revenue, r.purchases, r.profit, r.turnover, r.sales, r.utilities, r.transport
            );
        }
        if self.rows.is_empty() {
            let _ = writeln!(out, "  {NO_DATA}");
        }
        out
    }

    fn render_chart(&self, out: &mut String) {
        match &self.chart {
            ChartData::TimeSeries { chart, points } => {
                let _ = writeln!(out, "{}", chart.title());
                for p in points {
                    let _ = writeln!(
                        out,
                        "  {}  revenue={} purchases={} profit={}",
                        p.date, p.revenue, p.purchases, p.profit
                    );
                }
            }
            ChartData::Scatter { points } => {
                let _ = writeln!(out, "{}", ChartType::Scatter.title());
                for p in points {
                    let _ = writeln!(out, "  ({}, {})  {}", p.purchases, p.profit, p.date);
                }
            }
            ChartData::Pie { slices } => {
                let _ = writeln!(out, "{}", ChartType::Pie.title());
                for s in slices {
                    let _ = writeln!(out, "  {:<10} {}", s.category, format_currency(s.amount));
                }
            }
            ChartData::NoData { chart } => {
                let _ = writeln!(out, "{}", chart.title());
                let _ = writeln!(out, "  No data for the selected period.");
            }
        }
    }
}
