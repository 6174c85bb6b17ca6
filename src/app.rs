use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{self, ReplicateRows};
use crate::bed::PeakRecord;
use crate::config::{MetadataColumns, ResolvedConfig};
use crate::domain::{SampleId, TfName};
use crate::error::RossiError;
use crate::fetcher::Fetcher;
use crate::join;
use crate::metadata::{MetadataTable, Replicate};
use crate::motifs;
use crate::peaks;
use crate::remote::RemoteClient;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub metadata: Utf8PathBuf,
    pub sheet: String,
    pub columns: MetadataColumns,
    pub output_dir: Utf8PathBuf,
    pub max_motifs: u32,
}

impl From<&ResolvedConfig> for PipelineOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            metadata: config.metadata.clone(),
            sheet: config.sheet.clone(),
            columns: config.columns.clone(),
            output_dir: config.output_dir.clone(),
            max_motifs: config.max_motifs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplicateStatus {
    Joined { motifs: usize, rows: usize },
    NoMotifs,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplicateReport {
    pub replicate: String,
    pub sample_id: String,
    #[serde(flatten)]
    pub status: ReplicateStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TfStatus {
    Written,
    NoReplicates,
    NoResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct TfReport {
    pub tf: String,
    pub status: TfStatus,
    pub replicates: Vec<ReplicateReport>,
    pub rows_written: usize,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TfOutcome {
    Completed(TfReport),
    Failed { tf: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub outcomes: Vec<TfOutcome>,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TfOutcome::Failed { tf, error } => Some((tf.as_str(), error.as_str())),
            TfOutcome::Completed(_) => None,
        })
    }
}

pub struct App<C: RemoteClient> {
    fetcher: Fetcher<C>,
    options: PipelineOptions,
}

impl<C: RemoteClient> App<C> {
    pub fn new(fetcher: Fetcher<C>, options: PipelineOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn from_config(config: &ResolvedConfig, client: C) -> Self {
        let store = Store::new(config.data_dir.clone());
        let fetcher = Fetcher::new(
            store,
            client,
            &config.archive_base_url,
            &config.peaks_base_url,
        );
        Self::new(fetcher, PipelineOptions::from(config))
    }

    pub fn fetcher(&self) -> &Fetcher<C> {
        &self.fetcher
    }

    pub fn load_metadata(&self) -> Result<MetadataTable, RossiError> {
        MetadataTable::load(
            &self.options.metadata,
            &self.options.sheet,
            &self.options.columns,
        )
    }

    pub fn list_tfs(&self) -> Result<Vec<String>, RossiError> {
        Ok(self.load_metadata()?.tf_names())
    }

    pub fn run_tf(&self, tf: &TfName) -> Result<TfReport, RossiError> {
        let metadata = self.load_metadata()?;
        self.run_tf_with(&metadata, tf)
    }

    /// Runs every TF in the metadata. A TF that fails is recorded in the report
    /// and the run moves on to the next one.
    pub fn run_all(&self) -> Result<RunReport, RossiError> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let metadata = self.load_metadata()?;
        let tfs = metadata.tf_names();
        info!(count = tfs.len(), "running all transcription factors");

        let mut outcomes = Vec::with_capacity(tfs.len());
        for name in tfs {
            info!(tf = %name, "running pipeline");
            let result = name
                .parse::<TfName>()
                .and_then(|tf| self.run_tf_with(&metadata, &tf));
            match result {
                Ok(report) => outcomes.push(TfOutcome::Completed(report)),
                Err(err) => {
                    warn!(tf = %name, error = %err, "pipeline failed");
                    outcomes.push(TfOutcome::Failed {
                        tf: name,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(RunReport {
            started_at,
            outcomes,
        })
    }

    pub fn run_tf_with(
        &self,
        metadata: &MetadataTable,
        tf: &TfName,
    ) -> Result<TfReport, RossiError> {
        let replicates = metadata.replicates_for(tf);
        info!(tf = %tf, replicates = replicates.len(), "found replicates");
        if replicates.is_empty() {
            return Ok(TfReport {
                tf: tf.to_string(),
                status: TfStatus::NoReplicates,
                replicates: Vec::new(),
                rows_written: 0,
                output_path: None,
            });
        }

        let reference = peaks::load_reference_peaks(&self.fetcher, tf)?;

        let mut reports = Vec::with_capacity(replicates.len());
        let mut results = Vec::new();
        for replicate in &replicates {
            info!(
                replicate = %replicate.label,
                sample_id = %replicate.sample_id,
                "processing replicate"
            );
            let status = match self.process_replicate(replicate, &reference) {
                Ok(Some((motif_count, rows))) => {
                    let status = ReplicateStatus::Joined {
                        motifs: motif_count,
                        rows: rows.rows.len(),
                    };
                    results.push(rows);
                    status
                }
                Ok(None) => {
                    info!(sample_id = %replicate.sample_id, "no motif files found, skipping");
                    ReplicateStatus::NoMotifs
                }
                Err(err) => {
                    warn!(
                        sample_id = %replicate.sample_id,
                        error = %err,
                        "replicate failed, skipping"
                    );
                    ReplicateStatus::Failed {
                        error: err.to_string(),
                    }
                }
            };
            reports.push(ReplicateReport {
                replicate: replicate.label.clone(),
                sample_id: replicate.sample_id.clone(),
                status,
            });
        }

        let Some(table) = aggregate::aggregate(results) else {
            info!(tf = %tf, "no results found for any replicate");
            return Ok(TfReport {
                tf: tf.to_string(),
                status: TfStatus::NoResults,
                replicates: reports,
                rows_written: 0,
                output_path: None,
            });
        };

        let path = aggregate::output_path(&self.options.output_dir, tf);
        info!(path = %path, rows = table.len(), "saving final results");
        aggregate::write_table(&path, &table)?;

        Ok(TfReport {
            tf: tf.to_string(),
            status: TfStatus::Written,
            replicates: reports,
            rows_written: table.len(),
            output_path: Some(path.to_string()),
        })
    }

    /// `Ok(None)` when the sample has no motif files.
    fn process_replicate(
        &self,
        replicate: &Replicate,
        reference: &[PeakRecord],
    ) -> Result<Option<(usize, ReplicateRows)>, RossiError> {
        let sample: SampleId = replicate.sample_id.parse()?;
        let extract_dir = self.fetcher.ensure_sample_extracted(&sample)?;
        let motif_set = motifs::load_motifs(&extract_dir, &sample, self.options.max_motifs)?;
        if motif_set.is_empty() {
            return Ok(None);
        }
        let rows = join::join(reference, &motif_set);
        Ok(Some((
            motif_set.len(),
            ReplicateRows {
                sample_id: sample,
                replicate: replicate.label.clone(),
                rows,
            },
        )))
    }
}
