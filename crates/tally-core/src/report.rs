//! Result shaping and the end-to-end summary pipeline

use tracing::debug;

use crate::aggregate::aggregate_monthly;
use crate::error::Result;
use crate::models::{
    ChartSeries, MonthTotals, MonthlyDetail, MonthlySummary, SummaryReport, SummaryStatistics,
    Table,
};
use crate::normalize::normalize;
use crate::stats::compute_statistics;
use crate::validate::validate_schema;

/// Run the whole pipeline over a decoded table:
/// schema check, normalization, monthly aggregation, statistics, shaping.
pub fn summarize(table: &Table) -> Result<SummaryReport> {
    validate_schema(table)?;
    let transactions = normalize(table)?;
    let summaries = aggregate_monthly(&transactions);
    let stats = compute_statistics(&summaries)?;

    debug!(
        rows = table.len(),
        months = summaries.len(),
        "Built monthly summary"
    );
    Ok(shape_report(stats, &summaries))
}

/// Assemble the response from already computed pieces
pub fn shape_report(stats: SummaryStatistics, summaries: &[MonthlySummary]) -> SummaryReport {
    SummaryReport {
        summary_stats: stats,
        chart_data: chart_series(summaries),
        monthly_details: monthly_detail(summaries),
    }
}

pub fn chart_series(summaries: &[MonthlySummary]) -> ChartSeries {
    ChartSeries {
        labels: summaries.iter().map(|s| s.bucket.label.clone()).collect(),
        income_data: summaries.iter().map(|s| s.total_income).collect(),
        expenses_data: summaries.iter().map(|s| s.total_expenses).collect(),
    }
}

pub fn monthly_detail(summaries: &[MonthlySummary]) -> MonthlyDetail {
    let mut detail = MonthlyDetail::default();
    for s in summaries {
        detail.insert(
            s.bucket.label.clone(),
            MonthTotals {
                income: s.total_income,
                expenses: s.total_expenses,
            },
        );
    }
    detail
}
