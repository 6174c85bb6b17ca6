//! Containment join of reference peaks against motif occurrences.
//!
//! For every motif index, each reference peak is paired with every motif row on
//! the same chromosome whose closed span `[start, end]` contains the peak start.
//! The output keeps the peak's own coordinates and score, takes the strand from
//! the motif row, and records which motif index the row came from.
//!
//! Rows are emitted motif index by motif index; within one index they follow
//! reference order, then motif file order. Exact duplicates are dropped keeping
//! the first occurrence.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::bed::{MotifRecord, PeakRecord};
use crate::domain::Strand;
use crate::motifs::MotifSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub score: f64,
    pub strand: Strand,
    pub motif: u32,
}

impl JoinedRow {
    /// Identity used for peak-level deduplication: chrom, start, end and score.
    pub fn peak_key(&self) -> (String, u64, u64, u64) {
        (self.chrom.clone(), self.start, self.end, self.score.to_bits())
    }

    fn row_key(&self) -> (String, u64, u64, u64, Strand, u32) {
        (
            self.chrom.clone(),
            self.start,
            self.end,
            self.score.to_bits(),
            self.strand,
            self.motif,
        )
    }
}

pub fn join(reference: &[PeakRecord], motifs: &MotifSet) -> Vec<JoinedRow> {
    let mut rows = Vec::new();
    if reference.is_empty() {
        return rows;
    }

    for (&index, table) in motifs {
        let by_chrom = index_by_chrom(table);
        for peak in reference {
            let Some(candidates) = by_chrom.get(peak.chrom.as_str()) else {
                continue;
            };
            for motif in candidates {
                if motif.start <= peak.start && peak.start <= motif.end {
                    rows.push(JoinedRow {
                        chrom: peak.chrom.clone(),
                        start: peak.start,
                        end: peak.end,
                        score: peak.score,
                        strand: motif.strand,
                        motif: index,
                    });
                }
            }
        }
    }

    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.row_key()));
    rows
}

fn index_by_chrom(table: &[MotifRecord]) -> HashMap<&str, Vec<&MotifRecord>> {
    let mut map: HashMap<&str, Vec<&MotifRecord>> = HashMap::new();
    for record in table {
        map.entry(record.chrom.as_str()).or_default().push(record);
    }
    map
}
