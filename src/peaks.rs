use tracing::info;

use crate::bed::{self, PeakRecord};
use crate::domain::TfName;
use crate::error::RossiError;
use crate::fetcher::Fetcher;
use crate::remote::RemoteClient;

/// Downloads the ChExMix peak file for `tf` if it is not cached yet and parses it.
/// A file with any row that is not six columns wide is rejected here, before any
/// join runs against it.
pub fn load_reference_peaks<C: RemoteClient>(
    fetcher: &Fetcher<C>,
    tf: &TfName,
) -> Result<Vec<PeakRecord>, RossiError> {
    let path = fetcher.ensure_reference_peaks(tf)?;
    let peaks = bed::read_peaks(&path)?;
    info!(tf = %tf, peaks = peaks.len(), "loaded reference peaks");
    Ok(peaks)
}
