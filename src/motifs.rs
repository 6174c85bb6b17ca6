use std::collections::BTreeMap;

use camino::Utf8Path;
use tracing::{debug, info};

use crate::bed::{self, MotifRecord};
use crate::domain::SampleId;
use crate::error::RossiError;
use crate::store::Store;

/// Motif tables of one sample keyed by motif index, iterated in index order.
pub type MotifSet = BTreeMap<u32, Vec<MotifRecord>>;

/// Reads `{sample}_Motif_1_FourColor.bed`, `_2_`, ... from the extracted sample
/// directory. The scan stops at the first missing index, so files past a gap are
/// never read, and never goes beyond `max_motifs`. A sample without motif 1
/// yields an empty set.
pub fn load_motifs(
    extract_dir: &Utf8Path,
    sample: &SampleId,
    max_motifs: u32,
) -> Result<MotifSet, RossiError> {
    let mut motifs = MotifSet::new();
    for index in 1..=max_motifs {
        let path = Store::motif_path(extract_dir, sample, index);
        if !Store::exists(&path) {
            debug!(sample = %sample, index, "no further motif files");
            break;
        }
        info!(path = %path, "reading motif file");
        motifs.insert(index, bed::read_motifs(&path)?);
    }
    Ok(motifs)
}
