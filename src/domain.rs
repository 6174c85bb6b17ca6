use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RossiError;

/// Transcription factor common name as it appears in the metadata sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TfName(String);

impl TfName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trimmed, case-insensitive comparison against a raw metadata cell.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.0.to_lowercase()
    }

    /// First character upper-cased, the rest lower-cased (`ABF1` -> `Abf1`).
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    pub fn lowercased(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for TfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TfName {
    type Err = RossiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(RossiError::InvalidTfName(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = RossiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let is_valid = !trimmed.is_empty()
            && !trimmed.contains(['/', '\\'])
            && !trimmed.contains("..")
            && !trimmed.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(RossiError::InvalidSampleId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
    #[serde(rename = ".")]
    Unknown,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "."),
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." => Ok(Strand::Unknown),
            other => Err(format!("invalid strand {other:?}")),
        }
    }
}
