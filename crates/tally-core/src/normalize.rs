//! Row normalization: raw cells into typed transactions

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CellValue, MonthBucket, RawRow, Table, Transaction};
use crate::validate::{DATE_COLUMN, EXPENSES_COLUMN, INCOME_COLUMN};

/// Convert every row of a validated table into a [`Transaction`], keeping row order.
///
/// Rows without a date carry no month and are skipped. Any other unparseable
/// cell fails the whole table.
pub fn normalize(table: &Table) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::with_capacity(table.len());

    for (idx, row) in table.rows().iter().enumerate() {
        match normalize_row(row)? {
            Some(tx) => transactions.push(tx),
            None => debug!(row = idx + 2, "Skipping row without a date"),
        }
    }

    debug!("Normalized {} transactions", transactions.len());
    Ok(transactions)
}

fn normalize_row(row: &RawRow) -> Result<Option<Transaction>> {
    let date_cell = row.get(DATE_COLUMN).unwrap_or(&CellValue::Empty);
    if date_cell.is_empty() {
        return Ok(None);
    }

    let date = parse_date_cell(date_cell)?;
    let income = parse_amount_cell(row.get(INCOME_COLUMN))?;
    let expenses = parse_amount_cell(row.get(EXPENSES_COLUMN))?;

    Ok(Some(Transaction {
        date,
        income,
        expenses,
        bucket: MonthBucket::from_date(date),
    }))
}

fn parse_date_cell(cell: &CellValue) -> Result<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Ok(dt.date()),
        CellValue::Text(s) => parse_date(s),
        CellValue::Number(n) => serial_to_date(*n),
        other => Err(Error::Parse(format!("Unable to parse date: {}", other))),
    }
}

fn parse_amount_cell(cell: Option<&CellValue>) -> Result<f64> {
    match cell {
        None | Some(CellValue::Empty) => Ok(0.0),
        Some(CellValue::Number(n)) if n.is_finite() => Ok(*n),
        Some(CellValue::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(CellValue::Text(s)) => parse_amount(s),
        Some(other) => Err(Error::Parse(format!("Unable to parse amount: {}", other))),
    }
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d",  // 2024-01-15
        "%m/%d/%Y",  // 01/15/2024
        "%m/%d/%y",  // 01/15/24
        "%m-%d-%Y",  // 01-15-2024
        "%d/%m/%Y",  // 15/01/2024 (European)
        "%Y/%m/%d",  // 2024/01/15
        "%B %d, %Y", // January 15, 2024
        "%b %d, %Y", // Jan 15, 2024
        "%d %B %Y",  // 15 January 2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(Error::Parse(format!("Unable to parse date: {}", s)))
}

/// Convert a spreadsheet serial day number (1900 date system) to a date
pub fn serial_to_date(serial: f64) -> Result<NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)
        .ok_or_else(|| Error::Parse("invalid spreadsheet epoch".into()))?;
    if !serial.is_finite() || serial < 1.0 {
        return Err(Error::Parse(format!("Unable to parse date: {}", serial)));
    }
    // Out-of-range serials must not reach chrono's panicking constructors
    Duration::try_days(serial.floor() as i64)
        .and_then(|days| base.checked_add_signed(days))
        .ok_or_else(|| Error::Parse(format!("Unable to parse date: {}", serial)))
}

/// Parse an amount string, handling currency symbols and commas
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::Parse(format!("Unable to parse amount: {}", s)))
}
