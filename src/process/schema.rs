use std::collections::HashSet;

use crate::error::SchemaError;

/// Row key column.
pub const DATE_COLUMN: &str = "Date";

/// Columns published as percentage strings, stored as fractions.
pub const PERCENT_COLUMNS: [&str; 3] = ["Contango 2/1", "Contango 7/4", "Con 7/4 div 3"];

/// Assert the promoted header carries every column the normalizer relies on,
/// with no name repeated.
pub fn check_schema(header: &[String]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(header.len());
    for name in header {
        if !seen.insert(name.as_str()) {
            return Err(SchemaError::DuplicateColumn(name.clone()));
        }
    }

    std::iter::once(DATE_COLUMN)
        .chain(PERCENT_COLUMNS)
        .find(|required| !seen.contains(required))
        .map_or(Ok(()), |missing| {
            Err(SchemaError::MissingColumn(missing.to_string()))
        })
}

/// Position of `name` in `header`.
pub fn column_index(header: &[String], name: &str) -> Result<usize, SchemaError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
}
