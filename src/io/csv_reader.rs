//! Load a headered CSV file into a [`Dataset`].

use crate::core::dataset::Dataset;
use crate::core::error::DatasetError;
use crate::core::types::Value;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a CSV file with a header row.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let dataset = read_csv_from(File::open(path)?)?;
    debug!(
        "Read {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(dataset)
}

/// Read CSV data with a header row from any reader.
///
/// Short rows are padded with nulls.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(infer_cell).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;

    Dataset::from_rows(headers, rows)
}

/// Infer a typed value from a CSV cell.
///
/// Empty cells are null. Otherwise integer, float and boolean are tried in
/// that order before falling back to a string.
pub fn infer_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Integer(i);
    }
    // Digits required so that words like "nan" or "inf" stay strings
    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    Value::String(cell.to_string())
}
