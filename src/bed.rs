//! Header-less, tab-separated six-column interval files.

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::Strand;
use crate::error::RossiError;
use crate::fs_util;

pub const BED6_COLUMNS: usize = 6;

/// One motif occurrence from a `*_Motif_{n}_FourColor.bed` file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotifRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub col3: String,
    pub col4: String,
    pub strand: Strand,
}

/// One called peak from a `{Tf}_CX.bed` reference file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeakRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub score: f64,
    pub strand: Strand,
}

pub fn read_motifs(path: &Utf8Path) -> Result<Vec<MotifRecord>, RossiError> {
    read_bed6(path)
}

pub fn read_peaks(path: &Utf8Path) -> Result<Vec<PeakRecord>, RossiError> {
    read_bed6(path)
}

/// Reads every record of `path`, failing on the first row that does not have
/// exactly six columns or whose fields do not parse.
fn read_bed6<T: DeserializeOwned>(path: &Utf8Path) -> Result<Vec<T>, RossiError> {
    let reader = fs_util::open_text(path.as_std_path())?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let has_record = rdr.read_record(&mut record).map_err(|err| {
            let line = err.position().map(|pos| pos.line()).unwrap_or(0);
            RossiError::format(path.as_str(), line, err.to_string())
        })?;
        if !has_record {
            break;
        }
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        if is_track_line(&record) {
            continue;
        }
        if record.len() != BED6_COLUMNS {
            return Err(RossiError::format(
                path.as_str(),
                line,
                format!("expected {BED6_COLUMNS} columns, found {}", record.len()),
            ));
        }
        record.trim();
        let row: T = record
            .deserialize(None)
            .map_err(|err| RossiError::format(path.as_str(), line, err.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

fn is_track_line(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|first| first.starts_with("track") || first.starts_with("browser"))
        .unwrap_or(false)
}
