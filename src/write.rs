// src/write.rs

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::error::{ContangoError, ContangoResult};
use crate::process::{schema::DATE_COLUMN, ContangoTable};

/// File name written inside the destination folder.
pub const OUTPUT_FILE_NAME: &str = "vix_contago.csv";

fn format_value(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn write_records(table: &ContangoTable, path: &Path) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let mut header = Vec::with_capacity(table.columns.len() + 1);
    header.push(DATE_COLUMN.to_string());
    header.extend(table.columns.iter().cloned());
    wtr.write_record(&header)?;

    for (date, row) in table.dates.iter().zip(&table.values) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(row.iter().map(|v| format_value(*v)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `table` to `<dir>/vix_contago.csv`.
///
/// Goes through `.vix_contago.csv.tmp` and a rename, so on failure an older
/// file at the target is left as it was.
#[instrument(level = "info", skip(table, dir), fields(dir = %dir.as_ref().display(), rows = table.len()))]
pub fn write_contango_csv<P: AsRef<Path>>(table: &ContangoTable, dir: P) -> ContangoResult<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(OUTPUT_FILE_NAME);
    let tmp_path = dir.join(format!(".{}.tmp", OUTPUT_FILE_NAME));

    if let Err(e) = write_records(table, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ContangoError::write(&tmp_path, e));
    }

    fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ContangoError::write(&path, format!("renaming {:?} -> {:?}: {}", tmp_path, path, e))
    })?;

    debug!(path = %path.display(), "wrote csv");
    Ok(path)
}

/// Read a file produced by [`write_contango_csv`]. Empty fields are missing values.
pub fn read_contango_csv<P: AsRef<Path>>(path: P) -> ContangoResult<ContangoTable> {
    let path = path.as_ref();
    let err = |e: &dyn std::fmt::Display| ContangoError::write(path, e);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| err(&e))?;

    let headers = rdr.headers().map_err(|e| err(&e))?.clone();
    match headers.get(0) {
        Some(DATE_COLUMN) => {}
        other => return Err(err(&format!("first column is {:?}, expected Date", other))),
    }

    let mut table = ContangoTable {
        columns: headers.iter().skip(1).map(str::to_string).collect(),
        ..Default::default()
    };

    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| err(&e))?;
        let date_str = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| err(&format!("record {}: date '{}': {}", idx, date_str, e)))?;

        let row = record
            .iter()
            .skip(1)
            .map(|cell| {
                if cell.is_empty() {
                    Ok(None)
                } else {
                    cell.parse::<f64>()
                        .map(Some)
                        .map_err(|e| err(&format!("record {}: '{}': {}", idx, cell, e)))
                }
            })
            .collect::<ContangoResult<Vec<_>>>()?;

        table.dates.push(date);
        table.values.push(row);
    }

    Ok(table)
}
