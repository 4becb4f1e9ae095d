// src/process/mod.rs
pub mod date_parser;
pub mod raw_table;
pub mod schema;
pub mod utils;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{ContangoError, ParseError, SchemaError};
pub use raw_table::RawTable;
use schema::{check_schema, column_index, DATE_COLUMN, PERCENT_COLUMNS};
use utils::{clean_str, is_missing, parse_f64, parse_percent};

/// The cleaned contango history: one row per trading date, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContangoTable {
    /// Numeric column names in source order (the date column is the row key, not listed here).
    pub columns: Vec<String>,
    /// Row keys, strictly ascending.
    pub dates: Vec<NaiveDate>,
    /// `values[row][col]`; `None` is a missing measurement.
    pub values: Vec<Vec<Option<f64>>>,
}

impl ContangoTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// All values of `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }

    /// Cell at (`date`, `name`). Outer `None` if either key is unknown.
    pub fn get(&self, date: NaiveDate, name: &str) -> Option<Option<f64>> {
        let row = self.dates.binary_search(&date).ok()?;
        let col = self.columns.iter().position(|c| c == name)?;
        Some(self.values[row][col])
    }
}

/// Turn the scraped table into a [`ContangoTable`].
///
/// 1. `rows[0]` becomes the header; it and the last (footer) row are dropped.
/// 2. The header is checked for the date and percentage columns.
/// 3. Dates are parsed and rows sorted by date.
/// 4. Percentage columns become fractions, every other column a float;
///    `-` and empty cells become `None`.
///
/// Any failure aborts the whole table.
#[tracing::instrument(level = "debug", skip(raw), fields(raw_rows = raw.rows.len()))]
pub fn normalize(raw: RawTable) -> Result<ContangoTable, ContangoError> {
    let raw_rows = raw.rows.len();
    if raw_rows < 2 {
        return Err(SchemaError::TooFewRows(raw_rows).into());
    }
    if !raw.headers.is_empty() {
        debug!(headers = ?raw.headers, "ignoring page header, promoting first row");
    }

    // ─── 1) promote first row, drop it and the footer ────────────────
    let mut rows = raw.rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .iter()
        .map(|c| clean_str(c))
        .collect();
    let mut body: Vec<Vec<String>> = rows.collect();
    let footer = body.pop().unwrap_or_default();

    // ─── 2) schema ───────────────────────────────────────────────────
    check_schema(&header)?;
    let date_idx = column_index(&header, DATE_COLUMN)?;

    if let Some(d) = footer
        .get(date_idx)
        .and_then(|c| date_parser::parse_date(&clean_str(c)))
    {
        warn!(date = %d, "footer row looks like data; dropping it anyway");
    }

    for (i, row) in body.iter().enumerate() {
        if row.len() != header.len() {
            return Err(SchemaError::RaggedRow {
                row: i + 1,
                expected: header.len(),
                found: row.len(),
            }
            .into());
        }
    }

    // ─── 3) dates, sort ──────────────────────────────────────────────
    let mut keyed = Vec::with_capacity(body.len());
    for row in body {
        let cell = clean_str(&row[date_idx]);
        let date = date_parser::parse_date(&cell).ok_or(ParseError::Date(cell))?;
        keyed.push((date, row));
    }
    keyed.sort_by_key(|(d, _)| *d);
    if let Some(pair) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(ParseError::DuplicateDate(pair[0].0.to_string()).into());
    }

    // ─── 4) numeric coercion ─────────────────────────────────────────
    let value_cols: Vec<(usize, &String, bool)> = header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(i, name)| (i, name, PERCENT_COLUMNS.contains(&name.as_str())))
        .collect();

    let mut dates = Vec::with_capacity(keyed.len());
    let mut values = Vec::with_capacity(keyed.len());
    for (date, row) in keyed {
        let mut out = Vec::with_capacity(value_cols.len());
        for &(i, name, is_percent) in &value_cols {
            let cell = clean_str(&row[i]);
            if is_missing(&cell) {
                out.push(None);
                continue;
            }
            let parsed = if is_percent {
                parse_percent(&cell)
            } else {
                parse_f64(&cell)
            };
            match parsed {
                Some(v) => out.push(Some(v)),
                None => {
                    return Err(ParseError::Number {
                        column: name.clone(),
                        date: date.to_string(),
                        value: cell,
                    }
                    .into())
                }
            }
        }
        dates.push(date);
        values.push(out);
    }

    debug!(
        rows = dates.len(),
        columns = value_cols.len(),
        "normalized contango table"
    );

    Ok(ContangoTable {
        columns: value_cols.into_iter().map(|(_, n, _)| n.clone()).collect(),
        dates,
        values,
    })
}
