//! Summary statistics over monthly totals

use crate::error::{Error, Result};
use crate::models::{Extremum, MonthlySummary, SummaryStatistics};

/// Compute extrema and per-month averages.
///
/// Ties go to the earliest month in iteration order. Averages divide by the
/// number of months, not the number of transactions.
pub fn compute_statistics(summaries: &[MonthlySummary]) -> Result<SummaryStatistics> {
    if summaries.is_empty() {
        return Err(Error::EmptyResult);
    }

    let income = |s: &MonthlySummary| s.total_income;
    let expenses = |s: &MonthlySummary| s.total_expenses;

    let avg_income_amount = mean(summaries, income);
    let avg_expense_amount = mean(summaries, expenses);

    Ok(SummaryStatistics {
        highest_income: extremum(arg_max(summaries, income), income),
        lowest_income: extremum(arg_min(summaries, income), income),
        avg_income: format_currency(avg_income_amount),
        highest_expense: extremum(arg_max(summaries, expenses), expenses),
        lowest_expense: extremum(arg_min(summaries, expenses), expenses),
        avg_expense: format_currency(avg_expense_amount),
        avg_income_amount,
        avg_expense_amount,
    })
}

fn extremum(summary: &MonthlySummary, metric: impl Fn(&MonthlySummary) -> f64) -> Extremum {
    let amount = metric(summary);
    Extremum {
        month: summary.bucket.label.clone(),
        value: format_currency(amount),
        amount,
    }
}

// Strict comparisons keep the first occurrence on ties.
fn arg_max(
    summaries: &[MonthlySummary],
    metric: impl Fn(&MonthlySummary) -> f64,
) -> &MonthlySummary {
    let mut best = &summaries[0];
    for s in &summaries[1..] {
        if metric(s) > metric(best) {
            best = s;
        }
    }
    best
}

fn arg_min(
    summaries: &[MonthlySummary],
    metric: impl Fn(&MonthlySummary) -> f64,
) -> &MonthlySummary {
    let mut best = &summaries[0];
    for s in &summaries[1..] {
        if metric(s) < metric(best) {
            best = s;
        }
    }
    best
}

fn mean(summaries: &[MonthlySummary], metric: impl Fn(&MonthlySummary) -> f64) -> f64 {
    summaries.iter().map(metric).sum::<f64>() / summaries.len() as f64
}

/// Format an amount as dollars with thousands separators and two decimals.
///
/// ```
/// use tally_core::stats::format_currency;
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(-5.0), "$-5.00");
/// ```
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, group_thousands(whole), frac)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
