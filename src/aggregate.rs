use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use csv::WriterBuilder;
use serde::{Serialize, Serializer};

use crate::domain::{SampleId, Strand, TfName};
use crate::error::RossiError;
use crate::join::JoinedRow;
use crate::store::Store;

/// Joined rows of one replicate, tagged with where they came from.
#[derive(Debug, Clone)]
pub struct ReplicateRows {
    pub sample_id: SampleId,
    pub replicate: String,
    pub rows: Vec<JoinedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    #[serde(rename = "chr")]
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    #[serde(rename = "peakVal", serialize_with = "serialize_score")]
    pub score: f64,
    pub strand: Strand,
    pub motif: u32,
    pub sample_id: String,
    pub replicate: String,
}

/// Concatenates replicate results in the given order and keeps the first row
/// for every (chrom, start, end, score). Returns `None` when no replicate
/// contributed a single row.
pub fn aggregate(results: Vec<ReplicateRows>) -> Option<Vec<AggregatedRow>> {
    let mut seen = HashSet::new();
    let mut table = Vec::new();
    for result in results {
        for row in result.rows {
            if !seen.insert(row.peak_key()) {
                continue;
            }
            table.push(AggregatedRow {
                chrom: row.chrom,
                start: row.start,
                end: row.end,
                score: row.score,
                strand: row.strand,
                motif: row.motif,
                sample_id: result.sample_id.to_string(),
                replicate: result.replicate.clone(),
            });
        }
    }
    (!table.is_empty()).then_some(table)
}

/// `5.0` is written as `5`, `12.5` as `12.5`.
fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(score)
}

pub fn output_path(output_dir: &Utf8Path, tf: &TfName) -> Utf8PathBuf {
    output_dir.join(format!("{}_rossi_peak_w_strand.bed", tf.lowercased()))
}

/// Writes `rows` as a tab-separated table with a header line, replacing `path`
/// atomically.
pub fn write_table(path: &Utf8Path, rows: &[AggregatedRow]) -> Result<(), RossiError> {
    let mut temp = Store::temp_file_for(path)?;
    {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(temp.as_file_mut());
        for row in rows {
            writer
                .serialize(row)
                .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        }
        writer
            .flush()
            .map_err(|err| RossiError::Filesystem(err.to_string()))?;
    }
    Store::persist(temp, path)
}
