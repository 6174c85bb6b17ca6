use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::RossiError;

/// A downloaded sample archive opened for checking or unpacking.
pub struct SampleArchive {
    path: PathBuf,
    zip: ZipArchive<File>,
}

impl SampleArchive {
    pub fn open(path: &Path) -> Result<Self, RossiError> {
        let file = File::open(path).map_err(|err| {
            RossiError::Filesystem(format!("open archive {}: {err}", path.display()))
        })?;
        let zip = ZipArchive::new(file).map_err(|err| archive_error(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Reads every file entry to the end so a truncated or corrupt member
    /// fails here rather than halfway through unpacking. Returns the number
    /// of file entries.
    pub fn check(&mut self) -> Result<usize, RossiError> {
        let mut files = 0;
        for i in 0..self.zip.len() {
            let mut entry = self
                .zip
                .by_index(i)
                .map_err(|err| archive_error(&self.path, err))?;
            if entry.is_dir() {
                continue;
            }
            io::copy(&mut entry, &mut io::sink()).map_err(|err| RossiError::Archive {
                path: self.path.display().to_string(),
                message: format!("{}: {err}", entry.name()),
            })?;
            files += 1;
        }
        Ok(files)
    }

    /// Unpacks into `target_dir`, which is created even when the archive has
    /// no file entries. Entries that would land outside it are rejected.
    pub fn unpack_into(&mut self, target_dir: &Path) -> Result<usize, RossiError> {
        create_dir(target_dir)?;
        let mut files = 0;
        for i in 0..self.zip.len() {
            let mut entry = self
                .zip
                .by_index(i)
                .map_err(|err| archive_error(&self.path, err))?;
            let Some(relative) = entry.enclosed_name() else {
                return Err(RossiError::Archive {
                    path: self.path.display().to_string(),
                    message: format!("entry {:?} escapes the target directory", entry.name()),
                });
            };
            let dest = target_dir.join(relative);
            if entry.is_dir() {
                create_dir(&dest)?;
                continue;
            }
            if let Some(parent) = dest.parent() {
                create_dir(parent)?;
            }
            let mut out = File::create(&dest).map_err(|err| {
                RossiError::Filesystem(format!("create {}: {err}", dest.display()))
            })?;
            io::copy(&mut entry, &mut out).map_err(|err| {
                RossiError::Filesystem(format!("write {}: {err}", dest.display()))
            })?;
            files += 1;
        }
        Ok(files)
    }
}

pub fn open_text(path: &Path) -> Result<BufReader<File>, RossiError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| RossiError::Filesystem(format!("open {}: {err}", path.display())))
}

fn create_dir(path: &Path) -> Result<(), RossiError> {
    fs::create_dir_all(path)
        .map_err(|err| RossiError::Filesystem(format!("create {}: {err}", path.display())))
}

fn archive_error(path: &Path, err: ZipError) -> RossiError {
    RossiError::Archive {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
