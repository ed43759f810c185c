//! Tabular dataset with named columns and ordered rows.

use crate::core::error::DatasetError;
use crate::core::types::Value;
use indexmap::IndexMap;

/// A read-only table addressable by `(row, column)`.
///
/// Storage is columnar: each column is a `Vec<Value>` and all columns share
/// the same length. Column order is insertion order and row indices are
/// zero-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Vec<Value>>,
    row_count: usize,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from a header row and row-major cells.
    ///
    /// Short rows are padded with nulls; long rows are an error.
    pub fn from_rows<H, R>(headers: H, rows: R) -> Result<Self, DatasetError>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        for header in headers {
            let name = header.into();
            if columns.contains_key(&name) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            columns.insert(name, Vec::new());
        }

        let width = columns.len();
        let mut row_count = 0;
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(DatasetError::RowTooLong {
                    row: row_index,
                    expected: width,
                    got: row.len(),
                });
            }
            let mut cells = row.into_iter();
            for cells_out in columns.values_mut() {
                cells_out.push(cells.next().unwrap_or(Value::Null));
            }
            row_count += 1;
        }

        Ok(Self { columns, row_count })
    }

    /// Add a column, returning the extended dataset.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        if self.columns.contains_key(&name) {
            return Err(DatasetError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.row_count = values.len();
        } else if values.len() != self.row_count {
            return Err(DatasetError::LengthMismatch {
                column: name,
                expected: self.row_count,
                got: values.len(),
            });
        }

        self.columns.insert(name, values);
        Ok(self)
    }

    /// Get all values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Get a single cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(|values| values.get(row))
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Check if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
