//! Spreadsheet decoding
//!
//! Turns uploaded bytes into a [`Table`]: the first row is the header row,
//! every following non-blank row becomes a [`RawRow`](crate::models::RawRow).

use std::io::{Cursor, Read};

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveTime;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CellValue, Table};
use crate::normalize::serial_to_date;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Pick a format from a file name's extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl std::str::FromStr for SheetFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown sheet format: {} (valid: xlsx, csv)", s)),
        }
    }
}

impl std::fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decode a sheet in the given format
pub fn read_table(bytes: &[u8], format: SheetFormat) -> Result<Table> {
    match format {
        SheetFormat::Xlsx => read_xlsx(bytes),
        SheetFormat::Csv => read_csv(bytes),
    }
}

/// Decode the first worksheet of an .xlsx workbook
pub fn read_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Parse("workbook contains no sheets".into()))??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => Vec::new(),
    };

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .filter(|cells: &Vec<CellValue>| !cells.iter().all(CellValue::is_empty))
        .collect();

    debug!(
        columns = headers.len(),
        rows = data.len(),
        "Decoded xlsx worksheet"
    );
    Ok(Table::new(headers, data))
}

/// Decode a CSV file with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let cells: Vec<CellValue> = record.iter().map(CellValue::from).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        data.push(cells);
    }

    debug!(columns = headers.len(), rows = data.len(), "Decoded csv");
    Ok(Table::new(headers, data))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            // 1900 date system assumed; pure time cells stay numeric
            let serial = dt.as_f64();
            match serial_to_date(serial) {
                Ok(date) => CellValue::DateTime(date.and_time(NaiveTime::MIN)),
                Err(_) => CellValue::Number(serial),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}
