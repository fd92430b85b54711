//! HTML templates for the upload form and results page
//!
//! Templates are compiled into the binary so the server has no runtime
//! dependency on the working directory.

use serde::Serialize;
use tera::Tera;

use tally_core::stats::format_currency;
use tally_core::SummaryReport;

const BASE: &str = include_str!("../templates/base.html");
const INDEX: &str = include_str!("../templates/index.html");
const RESULTS: &str = include_str!("../templates/results.html");

/// Build the template registry
pub fn load() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", BASE),
        ("index.html", INDEX),
        ("results.html", RESULTS),
    ])?;
    Ok(tera)
}

/// One row of the per-month table, already formatted for display
#[derive(Debug, Serialize)]
pub struct DetailRow {
    pub month: String,
    pub income: String,
    pub expenses: String,
}

/// Detail rows in first-seen month order.
///
/// Tera walks maps in key order, so the page gets a list instead of the
/// `monthly_details` map.
pub fn detail_rows(report: &SummaryReport) -> Vec<DetailRow> {
    report
        .monthly_details
        .iter()
        .map(|(month, totals)| DetailRow {
            month: month.to_string(),
            income: format_currency(totals.income),
            expenses: format_currency(totals.expenses),
        })
        .collect()
}

/// Serialize the chart series for an inline `<script>` block
pub fn chart_json(report: &SummaryReport) -> serde_json::Result<String> {
    let json = serde_json::to_string(&report.chart_data)?;
    Ok(json.replace("</", "<\\/"))
}

/// Context for the results page
pub fn results_context(report: &SummaryReport) -> serde_json::Result<tera::Context> {
    let mut context = tera::Context::new();
    context.insert("summary_stats", &report.summary_stats);
    context.insert("chart_json", &chart_json(report)?);
    context.insert("details", &detail_rows(report));
    Ok(context)
}

/// Context for the upload form, with an optional flashed message
pub fn index_context(flash: Option<&str>) -> tera::Context {
    let mut context = tera::Context::new();
    if let Some(message) = flash.filter(|m| !m.is_empty()) {
        context.insert("flash", message);
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{summarize_bytes, SheetFormat};

    fn report() -> SummaryReport {
        let csv = "date,income,expenses\n\
                   2024-03-01,10,5\n\
                   2024-01-01,1200.5,30\n";
        summarize_bytes(csv.as_bytes(), SheetFormat::Csv).unwrap()
    }

    #[test]
    fn test_templates_load() {
        let tera = load().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&"index.html"));
        assert!(names.contains(&"results.html"));
    }

    #[test]
    fn test_detail_rows_keep_source_order() {
        let rows = detail_rows(&report());
        assert_eq!(rows[0].month, "March 2024");
        assert_eq!(rows[1].month, "January 2024");
        assert_eq!(rows[1].income, "$1,200.50");
    }

    #[test]
    fn test_index_renders_flash_escaped() {
        let tera = load().unwrap();
        let html = tera
            .render("index.html", &index_context(Some("<b>No file part</b>")))
            .unwrap();
        assert!(html.contains("&lt;b&gt;No file part&lt;&#x2F;b&gt;"));

        let html = tera.render("index.html", &index_context(None)).unwrap();
        assert!(!html.contains("class=\"flash\""));
    }

    #[test]
    fn test_results_render() {
        let tera = load().unwrap();
        let html = tera
            .render("results.html", &results_context(&report()).unwrap())
            .unwrap();
        assert!(html.contains("March 2024"));
        assert!(html.contains("$1,200.50"));
        assert!(html.contains("\"labels\":[\"March 2024\",\"January 2024\"]"));
    }
}
