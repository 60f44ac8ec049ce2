//! In-memory table with normalized column names.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::value::CellValue;
use crate::error::DatasetError;

/// Normalize a raw header: trimmed, lowercased, spaces replaced by underscores.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// An immutable, row-ordered table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset from raw headers and rows.
    ///
    /// Headers are normalized here and nowhere else. Rows are padded with
    /// empty cells or truncated to the header width.
    pub fn new<I, S>(headers: I, rows: Vec<Vec<CellValue>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = headers
            .into_iter()
            .map(|h| normalize_column_name(h.as_ref()))
            .collect();
        let width = columns.len();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Fail if any of the named columns is absent.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), DatasetError> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(DatasetError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Cell of `row` in `column`, if the column exists.
    pub fn cell<'a>(&self, row: &'a [CellValue], column: &str) -> Option<&'a CellValue> {
        self.column_index(column).and_then(|idx| row.get(idx))
    }

    /// Distinct non-missing values of a column as text, in first-seen order.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|cell| !cell.is_missing())
            .map(|cell| cell.to_string())
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }

    /// Rows whose `column` value renders exactly as `value`.
    pub fn rows_where(&self, column: &str, value: &str) -> Vec<&[CellValue]> {
        self.rows_matching(column, |cell| cell.to_string() == value)
    }

    /// Rows whose `column` value renders as `value`, ignoring case.
    pub fn rows_where_ignore_case(&self, column: &str, value: &str) -> Vec<&[CellValue]> {
        let wanted = value.to_lowercase();
        self.rows_matching(column, |cell| cell.to_string().to_lowercase() == wanted)
    }

    fn rows_matching<F>(&self, column: &str, predicate: F) -> Vec<&[CellValue]>
    where
        F: Fn(&CellValue) -> bool,
    {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };

        self.rows
            .iter()
            .filter(|row| row.get(idx).is_some_and(|cell| !cell.is_missing() && predicate(cell)))
            .map(Vec::as_slice)
            .collect()
    }

    /// Largest non-missing value of a column.
    pub fn max_value(&self, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|cell| !cell.is_missing())
            .max_by(|a, b| a.sort_cmp(b))
    }

    /// A row as an ordered JSON object over all columns.
    pub fn record_json(&self, row: &[CellValue]) -> Map<String, Value> {
        self.project_json(row, &self.columns)
    }

    /// A row as an ordered JSON object over the given columns.
    ///
    /// Columns not present in the dataset are skipped.
    pub fn project_json(&self, row: &[CellValue], columns: &[String]) -> Map<String, Value> {
        columns
            .iter()
            .filter_map(|column| {
                self.cell(row, column)
                    .map(|cell| (column.clone(), cell.to_json()))
            })
            .collect()
    }

    /// Write rows as CSV with every dataset column and a header line.
    pub fn to_csv(&self, rows: &[&[CellValue]]) -> Result<String, DatasetError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DatasetError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| DatasetError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}
