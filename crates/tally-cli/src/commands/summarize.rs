//! Summarize command implementation

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use tally_core::stats::format_currency;
use tally_core::{SheetFormat, SummaryReport};

/// Pick the input format from `--format` or the file extension
pub fn resolve_format(file: &Path, format: Option<&str>) -> Result<SheetFormat> {
    if let Some(format) = format {
        return format.parse().map_err(anyhow::Error::msg);
    }

    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("");
    SheetFormat::from_filename(name).with_context(|| {
        format!(
            "Cannot tell the format of {} (use --format xlsx or --format csv)",
            file.display()
        )
    })
}

pub fn cmd_summarize(file: &Path, format: Option<&str>, json: bool) -> Result<()> {
    let format = resolve_format(file, format)?;
    debug!(file = %file.display(), format = %format, "Summarizing sheet");

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let report = tally_core::summarize_bytes(&bytes, format)
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .with_context(|| format!("Failed to summarize {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", SummaryTable(&report));
    }

    Ok(())
}

/// Plain-text rendering of a summary: headline figures, then one row per month
pub struct SummaryTable<'a>(pub &'a SummaryReport);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let stats = &report.summary_stats;

        writeln!(f)?;
        writeln!(f, "📊 Monthly Summary ({} months)", report.monthly_details.len())?;
        writeln!(f, "   ─────────────────────────────────────────────")?;
        writeln!(
            f,
            "   Highest income:   {:>14}  {}",
            stats.highest_income.value, stats.highest_income.month
        )?;
        writeln!(
            f,
            "   Lowest income:    {:>14}  {}",
            stats.lowest_income.value, stats.lowest_income.month
        )?;
        writeln!(f, "   Average income:   {:>14}", stats.avg_income)?;
        writeln!(
            f,
            "   Highest expenses: {:>14}  {}",
            stats.highest_expense.value, stats.highest_expense.month
        )?;
        writeln!(
            f,
            "   Lowest expenses:  {:>14}  {}",
            stats.lowest_expense.value, stats.lowest_expense.month
        )?;
        writeln!(f, "   Average expenses: {:>14}", stats.avg_expense)?;
        writeln!(f)?;
        writeln!(f, "   {:<18} {:>14} {:>14}", "Month", "Income", "Expenses")?;
        writeln!(f, "   ─────────────────────────────────────────────")?;

        for (month, totals) in report.monthly_details.iter() {
            writeln!(
                f,
                "   {:<18} {:>14} {:>14}",
                month,
                format_currency(totals.income),
                format_currency(totals.expenses)
            )?;
        }

        Ok(())
    }
}
