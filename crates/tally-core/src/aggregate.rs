//! Monthly aggregation
//!
//! A stable group-by on the month bucket label: buckets come out in the order
//! their first transaction appears, never re-sorted by calendar or name.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{MonthlySummary, Transaction};

/// Group transactions into one [`MonthlySummary`] per distinct month label
pub fn aggregate_monthly(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut summaries: Vec<MonthlySummary> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        match positions.get(tx.bucket.label.as_str()) {
            Some(&pos) => {
                let summary = &mut summaries[pos];
                summary.total_income += tx.income;
                summary.total_expenses += tx.expenses;
            }
            None => {
                positions.insert(tx.bucket.label.as_str(), summaries.len());
                summaries.push(MonthlySummary {
                    bucket: tx.bucket.clone(),
                    total_income: tx.income,
                    total_expenses: tx.expenses,
                });
            }
        }
    }

    debug!(
        "Aggregated {} transactions into {} months",
        transactions.len(),
        summaries.len()
    );
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthBucket;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, income: f64, expenses: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Transaction {
            date,
            income,
            expenses,
            bucket: MonthBucket::from_date(date),
        }
    }

    fn labels(summaries: &[MonthlySummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.bucket.label.as_str()).collect()
    }

    #[test]
    fn test_first_seen_order_not_calendar_order() {
        let summaries = aggregate_monthly(&[
            tx(2024, 3, 1, 1.0, 0.0),
            tx(2024, 1, 1, 1.0, 0.0),
            tx(2024, 3, 20, 1.0, 0.0),
            tx(2024, 2, 1, 1.0, 0.0),
        ]);
        assert_eq!(labels(&summaries), ["March 2024", "January 2024", "February 2024"]);
    }

    #[test]
    fn test_sums_per_bucket() {
        let summaries = aggregate_monthly(&[
            tx(2024, 1, 10, 100.0, 50.0),
            tx(2024, 2, 5, 50.0, 80.0),
            tx(2024, 1, 20, 200.0, 70.0),
        ]);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_income, 300.0);
        assert_eq!(summaries[0].total_expenses, 120.0);
        assert_eq!(summaries[1].total_income, 50.0);
        assert_eq!(summaries[1].total_expenses, 80.0);
    }

    #[test]
    fn test_same_month_different_years_are_distinct() {
        let summaries = aggregate_monthly(&[tx(2023, 5, 1, 1.0, 1.0), tx(2024, 5, 1, 1.0, 1.0)]);
        assert_eq!(labels(&summaries), ["May 2023", "May 2024"]);
    }

    #[test]
    fn test_single_row() {
        let summaries = aggregate_monthly(&[tx(2024, 3, 15, 1000.0, 400.0)]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].bucket.label, "March 2024");
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_monthly(&[]).is_empty());
    }
}
