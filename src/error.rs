use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RossiError {
    #[error("invalid transcription factor name: {0:?}")]
    InvalidTfName(String),

    #[error("invalid sample id: {0:?}")]
    InvalidSampleId(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("no metadata source configured (set \"metadata\" in rossi-strand.json or pass --metadata)")]
    #[diagnostic(help("point it at the supplementary workbook or a CSV/TSV export of it"))]
    MissingMetadataSource,

    #[error("metadata not found: {0}")]
    MetadataNotFound(String),

    #[error("metadata column {column:?} missing from {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("{path}:{line}: {message}")]
    Format {
        path: String,
        line: u64,
        message: String,
    },

    #[error("request failed: {0}")]
    Http(String),

    #[error("{url} returned status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("archive {path} is unreadable: {message}")]
    #[diagnostic(help("the archive may be truncated or corrupt"))]
    Archive { path: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl RossiError {
    pub fn format(path: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        RossiError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, RossiError::Http(_) | RossiError::HttpStatus { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RossiError::MetadataNotFound(_) | RossiError::MissingMetadataSource
        )
    }
}
