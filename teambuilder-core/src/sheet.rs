//! Spreadsheet reader: turns an xlsx workbook, a CSV export or a JSON row dump
//! into raw rows.

use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, XlsxError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading tabular row data.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xlsx parsing error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("row data must be a JSON array of objects")]
    NotAnArray,
    #[error("unsupported sheet format: {0}")]
    UnsupportedFormat(String),
}

/// Source formats the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    Xlsx,
    Csv,
    Json,
}

impl SheetFormat {
    /// Pick a format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::UnsupportedFormat`] for anything but `xlsx`, `csv` and `json`.
    pub fn from_extension(ext: &str) -> Result<Self, SheetError> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(SheetError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// One untyped spreadsheet row, keyed by column header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterRow(BTreeMap<String, String>);

impl CharacterRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    /// Look up a cell by header. Exact header match wins over a case-insensitive one.
    /// Blank cells read as missing.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let raw = self.0.get(column).or_else(|| {
            self.0
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CharacterRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse raw bytes in the given format into rows. Blank rows are skipped.
///
/// # Errors
///
/// Returns an error if the bytes are not a readable workbook, CSV or JSON row data.
pub fn parse_rows(bytes: &[u8], format: SheetFormat) -> Result<Vec<CharacterRow>, SheetError> {
    match format {
        SheetFormat::Xlsx => parse_xlsx(bytes),
        SheetFormat::Csv => parse_csv(bytes),
        SheetFormat::Json => parse_json(bytes),
    }
}

/// Read the first worksheet of an xlsx workbook. The first row holds the
/// headers; empty cells are left out of each row.
///
/// # Errors
///
/// Returns an error if the bytes are not an xlsx workbook or it has no sheets.
pub fn parse_xlsx(bytes: &[u8]) -> Result<Vec<CharacterRow>, SheetError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;

    let mut records = range.rows();
    let Some(header_row) = records.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in records {
        let row: CharacterRow = headers
            .iter()
            .zip(record)
            .filter(|(header, cell)| !header.is_empty() && !matches!(cell, Data::Empty))
            .map(|(header, cell)| (header.as_str(), cell.to_string().trim().to_string()))
            .collect();
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse a CSV export with a header line.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or not UTF-8.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<CharacterRow>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: CharacterRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .collect();
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse a JSON array of row objects. Numbers and booleans keep their textual
/// form; array cells are joined with `", "`; nulls are dropped.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or is not an array of objects.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<CharacterRow>, SheetError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Array(items) = value else {
        return Err(SheetError::NotAnArray);
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            return Err(SheetError::NotAnArray);
        };
        let row: CharacterRow = map
            .into_iter()
            .filter_map(|(key, cell)| cell_text(cell).map(|text| (key, text)))
            .collect();
        if !row.is_blank() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn cell_text(cell: Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(cell_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(cell.to_string()),
    }
}
