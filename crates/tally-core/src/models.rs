//! Domain models for Tally

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single cell as decoded from the source sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A cell the sheet itself typed as a date
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

/// An untyped row keyed by column name
///
/// Only lives between decoding the sheet and normalizing it into
/// [`Transaction`]s.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_empty)
    }
}

/// A decoded sheet: a header set plus rows in source order
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

impl Table {
    /// Build a table from a header row and positional data rows.
    ///
    /// Header names are trimmed. When a name repeats, the first column keeps
    /// it and later ones are ignored. Cells beyond the header width are dropped.
    pub fn new<H, S>(headers: H, data: Vec<Vec<CellValue>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: Vec<Option<usize>> = Vec::new();
        for header in headers {
            let name = header.as_ref().trim().to_string();
            if name.is_empty() || columns.contains(&name) {
                positions.push(None);
            } else {
                positions.push(Some(columns.len()));
                columns.push(name);
            }
        }

        let rows = data
            .into_iter()
            .map(|cells| {
                let mut map = HashMap::with_capacity(columns.len());
                for (pos, cell) in cells.into_iter().enumerate() {
                    if let Some(Some(col)) = positions.get(pos) {
                        map.insert(columns[*col].clone(), cell);
                    }
                }
                RawRow { cells: map }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Calendar (year, month) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

/// A month bucket: the semantic key plus its display label ("March 2024")
///
/// Buckets are grouped by label, so two dates that render to the same label
/// always share a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub label: String,
}

impl MonthBucket {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            key: MonthKey {
                year: date.year(),
                month: date.month(),
            },
            label: date.format("%B %Y").to_string(),
        }
    }
}

/// A normalized transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub bucket: MonthBucket,
}

/// Totals for one month bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub bucket: MonthBucket,
    pub total_income: f64,
    pub total_expenses: f64,
}

/// A month holding an extreme value, with the value rendered for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub month: String,
    pub value: String,
    /// Raw numeric value behind `value`
    #[serde(skip)]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub highest_income: Extremum,
    pub lowest_income: Extremum,
    pub avg_income: String,
    pub highest_expense: Extremum,
    pub lowest_expense: Extremum,
    pub avg_expense: String,
    #[serde(skip)]
    pub avg_income_amount: f64,
    #[serde(skip)]
    pub avg_expense_amount: f64,
}

/// Index-aligned series for charting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub income_data: Vec<f64>,
    pub expenses_data: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub income: f64,
    pub expenses: f64,
}

/// Month label -> totals, iterated in insertion order
///
/// Inserting a label that is already present replaces its totals in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyDetail {
    entries: Vec<(String, MonthTotals)>,
    index: HashMap<String, usize>,
}

impl MonthlyDetail {
    pub fn insert(&mut self, label: String, totals: MonthTotals) {
        match self.index.get(&label) {
            Some(&pos) => self.entries[pos].1 = totals,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, totals));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&MonthTotals> {
        self.index.get(label).map(|&pos| &self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonthTotals)> {
        self.entries.iter().map(|(label, totals)| (label.as_str(), totals))
    }
}

impl Serialize for MonthlyDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, totals) in &self.entries {
            map.serialize_entry(label, totals)?;
        }
        map.end()
    }
}

/// The full response handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub summary_stats: SummaryStatistics,
    pub chart_data: ChartSeries,
    pub monthly_details: MonthlyDetail,
}
