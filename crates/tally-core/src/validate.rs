//! Column schema check, run before any row is parsed

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Table;

pub const DATE_COLUMN: &str = "date";
pub const INCOME_COLUMN: &str = "income";
pub const EXPENSES_COLUMN: &str = "expenses";

/// Columns every sheet must carry
pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, INCOME_COLUMN, EXPENSES_COLUMN];

/// Verify the table has `date`, `income` and `expenses` columns
pub fn validate_schema(table: &Table) -> Result<()> {
    if REQUIRED_COLUMNS.iter().all(|c| table.has_column(c)) {
        return Ok(());
    }

    debug!(columns = ?table.columns(), "Required columns missing");
    Err(Error::Schema)
}
