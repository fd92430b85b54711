//! Tally Core Library
//!
//! Turns a spreadsheet of dated transactions into a monthly income/expense
//! summary:
//! - Sheet decoding (xlsx, csv) into untyped tables
//! - Column schema validation
//! - Row normalization into typed transactions with month buckets
//! - First-seen-order monthly aggregation
//! - Summary statistics (extrema, averages) and the response contract

pub mod aggregate;
pub mod error;
pub mod models;
pub mod normalize;
pub mod report;
pub mod sheet;
pub mod stats;
pub mod validate;

pub use error::{Error, ErrorKind, Result};
pub use models::{
    CellValue, ChartSeries, Extremum, MonthBucket, MonthKey, MonthTotals, MonthlyDetail,
    MonthlySummary, RawRow, SummaryReport, SummaryStatistics, Table, Transaction,
};
pub use report::summarize;
pub use sheet::{read_table, SheetFormat};

/// Decode a sheet and summarize it in one step
pub fn summarize_bytes(bytes: &[u8], format: SheetFormat) -> Result<SummaryReport> {
    let table = read_table(bytes, format)?;
    summarize(&table)
}
