use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::RossiError;

pub const DEFAULT_CONFIG_FILE: &str = "rossi-strand.json";
pub const DEFAULT_SHEET: &str = "GEO_GPL19756_GSE147927";
pub const DEFAULT_ARCHIVE_BASE_URL: &str =
    "https://www.datacommons.psu.edu/download/eberly/pughlab/yeast-epigenome-project";
pub const DEFAULT_PEAKS_BASE_URL: &str =
    "https://github.com/CEGRcode/2021-Rossi_Nature/raw/master/04_ChExMix_Peaks";
pub const DEFAULT_MAX_MOTIFS: u32 = 256;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: Option<ColumnsEntry>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub archive_base_url: Option<String>,
    #[serde(default)]
    pub peaks_base_url: Option<String>,
    #[serde(default)]
    pub max_motifs: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ColumnsEntry {
    #[serde(default)]
    pub tf: Option<String>,
    #[serde(default)]
    pub replicate: Option<String>,
    #[serde(default)]
    pub sample_id: Option<String>,
}

/// Header names of the three metadata columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataColumns {
    pub tf: String,
    pub replicate: String,
    pub sample_id: String,
}

impl Default for MetadataColumns {
    fn default() -> Self {
        Self {
            tf: "Yeast Target Common Name".to_string(),
            replicate: "Replicate".to_string(),
            sample_id: "Sample ID".to_string(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub metadata: Option<String>,
    pub sheet: Option<String>,
    pub data_dir: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub metadata: Utf8PathBuf,
    pub sheet: String,
    pub columns: MetadataColumns,
    pub data_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub archive_base_url: String,
    pub peaks_base_url: String,
    pub max_motifs: u32,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, RossiError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| RossiError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content).map_err(|err| RossiError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, RossiError> {
        let metadata = overrides
            .metadata
            .or(config.metadata)
            .ok_or(RossiError::MissingMetadataSource)?;

        let data_dir = match overrides.data_dir.or(config.data_dir) {
            Some(dir) => Utf8PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let defaults = MetadataColumns::default();
        let columns = match config.columns {
            Some(entry) => MetadataColumns {
                tf: entry.tf.unwrap_or(defaults.tf),
                replicate: entry.replicate.unwrap_or(defaults.replicate),
                sample_id: entry.sample_id.unwrap_or(defaults.sample_id),
            },
            None => defaults,
        };

        Ok(ResolvedConfig {
            metadata: Utf8PathBuf::from(metadata),
            sheet: overrides
                .sheet
                .or(config.sheet)
                .unwrap_or_else(|| DEFAULT_SHEET.to_string()),
            columns,
            data_dir,
            output_dir: Utf8PathBuf::from(
                overrides
                    .output_dir
                    .or(config.output_dir)
                    .unwrap_or_else(|| "output".to_string()),
            ),
            archive_base_url: config
                .archive_base_url
                .unwrap_or_else(|| DEFAULT_ARCHIVE_BASE_URL.to_string()),
            peaks_base_url: config
                .peaks_base_url
                .unwrap_or_else(|| DEFAULT_PEAKS_BASE_URL.to_string()),
            max_motifs: config.max_motifs.unwrap_or(DEFAULT_MAX_MOTIFS),
        })
    }
}

fn default_data_dir() -> Result<Utf8PathBuf, RossiError> {
    BaseDirs::new()
        .and_then(|dirs| {
            Utf8PathBuf::from_path_buf(dirs.home_dir().join(".cache").join("rossi-strand")).ok()
        })
        .ok_or_else(|| RossiError::Filesystem("unable to resolve cache directory".to_string()))
}
