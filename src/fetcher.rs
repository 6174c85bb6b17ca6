//! Downloads and unpacks per-sample archives and per-TF reference peak files.
//!
//! Every artifact is fetched at most once: a file that already exists under the
//! data root is reused as-is. Downloads are written to a temp file and renamed
//! into place, and archives are unpacked into a temp directory that is renamed
//! once extraction finishes, so an interrupted run never leaves a partial
//! artifact that later runs would mistake for a complete one.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::{SampleId, TfName};
use crate::error::RossiError;
use crate::fs_util::SampleArchive;
use crate::remote::{RemoteClient, join_url};
use crate::store::{Store, atomic_rename_dir};

pub struct Fetcher<C: RemoteClient> {
    store: Store,
    client: C,
    archive_base_url: String,
    peaks_base_url: String,
}

impl<C: RemoteClient> Fetcher<C> {
    pub fn new(store: Store, client: C, archive_base_url: &str, peaks_base_url: &str) -> Self {
        Self {
            store,
            client,
            archive_base_url: archive_base_url.to_string(),
            peaks_base_url: peaks_base_url.to_string(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn archive_url(&self, sample: &SampleId) -> String {
        join_url(&self.archive_base_url, &Store::archive_file_name(sample))
    }

    pub fn peaks_url(&self, tf: &TfName) -> String {
        join_url(&self.peaks_base_url, &Store::peaks_file_name(tf))
    }

    /// Returns the directory the sample archive is unpacked into. A fresh
    /// download is read through before it is moved into place, so a corrupt
    /// archive never occupies the cache slot.
    pub fn ensure_sample_extracted(&self, sample: &SampleId) -> Result<Utf8PathBuf, RossiError> {
        self.store.ensure_data_root()?;

        let archive = self.store.sample_archive_path(sample);
        if Store::exists(&archive) {
            debug!(path = %archive, "archive already downloaded");
        } else {
            let temp = self.download_temp(&self.archive_url(sample), &archive)?;
            let files = SampleArchive::open(temp.path())?.check()?;
            debug!(files, "archive verified");
            Store::persist(temp, &archive)?;
            info!(path = %archive, "saved");
        }

        let extract_dir = self.store.sample_extract_dir(sample);
        if Store::exists(&extract_dir) {
            debug!(path = %extract_dir, "archive already extracted");
            return Ok(extract_dir);
        }

        info!(archive = %archive, target = %extract_dir, "extracting");
        let mut zip = SampleArchive::open(archive.as_std_path())?;
        zip.check()?;
        let temp = Store::temp_dir_for(&extract_dir)?;
        let staging = temp.path().join("extract");
        let files = zip.unpack_into(&staging)?;
        debug!(files, "unpacked");
        atomic_rename_dir(&staging, extract_dir.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        Ok(extract_dir)
    }

    /// Returns the cached path of the reference peak file for `tf`.
    pub fn ensure_reference_peaks(&self, tf: &TfName) -> Result<Utf8PathBuf, RossiError> {
        self.store.ensure_data_root()?;

        let path = self.store.reference_peaks_path(tf);
        if Store::exists(&path) {
            debug!(path = %path, "reference peaks already downloaded");
        } else {
            let temp = self.download_temp(&self.peaks_url(tf), &path)?;
            Store::persist(temp, &path)?;
            info!(path = %path, "saved");
        }
        Ok(path)
    }

    /// Downloads `url` into a temp file beside `dest`. The caller decides
    /// whether to persist it.
    fn download_temp(&self, url: &str, dest: &Utf8Path) -> Result<NamedTempFile, RossiError> {
        info!(url, "downloading");
        let temp = Store::temp_file_for(dest)?;
        let start = std::time::Instant::now();
        self.client.download(url, temp.path())?;
        debug!(
            url,
            latency_ms = start.elapsed().as_millis() as u64,
            "downloaded"
        );
        Ok(temp)
    }
}
