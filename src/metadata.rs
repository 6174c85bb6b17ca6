//! Sample metadata: which replicate samples belong to which transcription factor.
//!
//! The source is either a spreadsheet workbook (read with calamine, one named
//! sheet) or a delimited text export of that sheet. Only three columns are read;
//! their header names come from [`MetadataColumns`] and are checked when the
//! table is loaded.

use std::collections::HashSet;

use calamine::{Data, Reader, open_workbook_auto};
use camino::Utf8Path;
use csv::ReaderBuilder;
use serde::Serialize;
use tracing::debug;

use crate::config::MetadataColumns;
use crate::domain::TfName;
use crate::error::RossiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub tf_name: String,
    pub replicate: String,
    pub sample_id: String,
}

/// A distinct (replicate label, sample id) pair for one TF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Replicate {
    pub label: String,
    pub sample_id: String,
}

#[derive(Debug, Clone)]
pub struct MetadataTable {
    source: String,
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    pub fn load(
        path: &Utf8Path,
        sheet: &str,
        columns: &MetadataColumns,
    ) -> Result<Self, RossiError> {
        if !path.as_std_path().is_file() {
            return Err(RossiError::MetadataNotFound(path.to_string()));
        }
        match delimiter_for(path) {
            Some(delimiter) => Self::load_delimited(path, delimiter, columns),
            None => Self::load_workbook(path, sheet, columns),
        }
    }

    fn load_workbook(
        path: &Utf8Path,
        sheet: &str,
        columns: &MetadataColumns,
    ) -> Result<Self, RossiError> {
        let mut workbook = open_workbook_auto(path.as_std_path())
            .map_err(|err| RossiError::Spreadsheet(format!("{path}: {err}")))?;
        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(RossiError::MetadataNotFound(format!(
                "sheet {sheet:?} in {path}"
            )));
        }
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|err| RossiError::Spreadsheet(format!("{path}: {err}")))?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        let header = rows.next().unwrap_or_default();
        Self::from_rows(format!("{path} [{sheet}]"), &header, rows, columns)
    }

    fn load_delimited(
        path: &Utf8Path,
        delimiter: u8,
        columns: &MetadataColumns,
    ) -> Result<Self, RossiError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_std_path())
            .map_err(|err| RossiError::Filesystem(format!("{path}: {err}")))?;
        let header = rdr
            .headers()
            .map_err(|err| RossiError::format(path.as_str(), 1, err.to_string()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|err| {
                let line = err.position().map(|pos| pos.line()).unwrap_or(0);
                RossiError::format(path.as_str(), line, err.to_string())
            })?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Self::from_rows(path.to_string(), &header, records.into_iter(), columns)
    }

    /// Builds the table from a header row and data rows, resolving the three
    /// configured columns by name. Short rows read as empty cells.
    pub fn from_rows<I>(
        source: String,
        header: &[String],
        rows: I,
        columns: &MetadataColumns,
    ) -> Result<Self, RossiError>
    where
        I: Iterator<Item = Vec<String>>,
    {
        let position = |name: &str| {
            header
                .iter()
                .position(|cell| cell.trim() == name)
                .ok_or_else(|| RossiError::MissingColumn {
                    column: name.to_string(),
                    source_name: source.clone(),
                })
        };
        let tf_col = position(&columns.tf)?;
        let replicate_col = position(&columns.replicate)?;
        let sample_col = position(&columns.sample_id)?;

        let cell = |row: &[String], idx: usize| {
            row.get(idx)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let rows = rows
            .map(|row| MetadataRow {
                tf_name: cell(&row, tf_col),
                replicate: cell(&row, replicate_col),
                sample_id: cell(&row, sample_col),
            })
            .collect::<Vec<_>>();
        debug!(source = %source, rows = rows.len(), "loaded metadata");

        Ok(Self { source, rows })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    /// Distinct (replicate, sample id) pairs for `tf`, in sheet order.
    pub fn replicates_for(&self, tf: &TfName) -> Vec<Replicate> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| tf.matches(&row.tf_name))
            .map(|row| Replicate {
                label: row.replicate.clone(),
                sample_id: row.sample_id.clone(),
            })
            .filter(|replicate| seen.insert(replicate.clone()))
            .collect()
    }

    /// Distinct non-empty TF names as written in the sheet, in sheet order.
    /// Names are not validated here; a name that cannot be a [`TfName`] is
    /// still listed so the driver can report it.
    pub fn tf_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.tf_name.as_str())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_ascii_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

fn delimiter_for(path: &Utf8Path) -> Option<u8> {
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("csv") => Some(b','),
        Some("tsv") | Some("tab") | Some("txt") => Some(b'\t'),
        _ => None,
    }
}

/// Renders a spreadsheet cell the way it reads in the sheet; whole floats lose
/// their fractional part so numeric sample ids stay `10923`, not `10923.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        other => other.to_string(),
    }
}
