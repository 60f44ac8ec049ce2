//! Dataset file readers (Excel/ODS workbooks and delimited text).

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};

use super::table::Dataset;
use super::value::CellValue;
use crate::error::DatasetError;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Supported on-disk formats, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Workbook,
    Delimited(u8),
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Delimited(b',')),
            "tsv" => Ok(Self::Delimited(b'\t')),
            _ => Err(DatasetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a dataset from disk.
///
/// The first row is the header. For workbooks the named sheet is used, or
/// the first sheet when none is given.
pub fn load_dataset(path: &Path, sheet: Option<&str>) -> Result<Dataset, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    match DatasetFormat::from_path(path)? {
        DatasetFormat::Workbook => load_workbook(path, sheet),
        DatasetFormat::Delimited(delimiter) => load_delimited(path, delimiter),
    }
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Dataset, DatasetError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DatasetError::Workbook(format!("{}: {}", path.display(), e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| DatasetError::Empty(path.display().to_string()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DatasetError::Workbook(format!("sheet '{}': {}", sheet_name, e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DatasetError::Empty(format!("{} [{}]", path.display(), sheet_name)))?
        .iter()
        .map(|cell| convert_cell(cell).to_string())
        .collect();

    let records: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_missing()))
        .collect();

    tracing::debug!(
        sheet = %sheet_name,
        columns = headers.len(),
        rows = records.len(),
        "Read workbook"
    );

    Ok(Dataset::new(headers, records))
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.is_empty() {
        return Err(DatasetError::Empty(path.display().to_string()));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<CellValue> = record.iter().map(CellValue::parse).collect();
        if row.iter().any(|cell| !cell.is_missing()) {
            records.push(row);
        }
    }

    tracing::debug!(columns = headers.len(), rows = records.len(), "Read delimited file");

    Ok(Dataset::new(headers, records))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Float(*n),
        Data::Int(n) => CellValue::Int(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_iso(serial)
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Float(serial))
        }
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convert an Excel serial date (1900 system) to ISO text.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::milliseconds(millis))?;

    if millis % (MILLIS_PER_DAY as i64) == 0 {
        Some(datetime.format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}
