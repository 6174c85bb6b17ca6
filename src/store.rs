use std::fs;
use std::io;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::{Builder, NamedTempFile, TempDir};

use crate::domain::{SampleId, TfName};
use crate::error::RossiError;

/// On-disk layout of downloaded archives, extracted samples and reference peaks.
#[derive(Debug, Clone)]
pub struct Store {
    data_root: Utf8PathBuf,
}

impl Store {
    pub fn new(data_root: Utf8PathBuf) -> Self {
        Self { data_root }
    }

    pub fn data_root(&self) -> &Utf8Path {
        &self.data_root
    }

    pub fn archive_file_name(sample: &SampleId) -> String {
        format!("{sample}_YEP.zip")
    }

    pub fn sample_archive_path(&self, sample: &SampleId) -> Utf8PathBuf {
        self.data_root.join(Self::archive_file_name(sample))
    }

    pub fn sample_extract_dir(&self, sample: &SampleId) -> Utf8PathBuf {
        self.data_root.join(sample.as_str())
    }

    /// `{extract_dir}/{sample}_YEP/{sample}_Motif_{index}_FourColor.bed`
    pub fn motif_path(extract_dir: &Utf8Path, sample: &SampleId, index: u32) -> Utf8PathBuf {
        extract_dir
            .join(format!("{sample}_YEP"))
            .join(format!("{sample}_Motif_{index}_FourColor.bed"))
    }

    pub fn peaks_file_name(tf: &TfName) -> String {
        format!("{}_CX.bed", tf.capitalized())
    }

    pub fn reference_peaks_path(&self, tf: &TfName) -> Utf8PathBuf {
        self.data_root.join(Self::peaks_file_name(tf))
    }

    pub fn ensure_data_root(&self) -> Result<(), RossiError> {
        fs::create_dir_all(self.data_root.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))
    }

    pub fn exists(path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    /// Temp file in the same directory as `dest`, so `persist` is a rename.
    pub fn temp_file_for(dest: &Utf8Path) -> Result<NamedTempFile, RossiError> {
        let parent = dest
            .parent()
            .ok_or_else(|| RossiError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        Builder::new()
            .prefix("rossi-strand-file")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))
    }

    pub fn temp_dir_for(dest: &Utf8Path) -> Result<TempDir, RossiError> {
        let parent = dest
            .parent()
            .ok_or_else(|| RossiError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        Builder::new()
            .prefix("rossi-strand-extract")
            .tempdir_in(parent.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))
    }

    pub fn persist(temp: NamedTempFile, dest: &Utf8Path) -> Result<(), RossiError> {
        if dest.as_std_path().exists() {
            fs::remove_file(dest.as_std_path())
                .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        }
        temp.persist(dest.as_std_path())
            .map_err(|err| RossiError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

pub fn atomic_rename_dir(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        fs::remove_dir_all(to)?;
    }
    fs::rename(from, to)
}
