use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ReplicateStatus, RunReport, TfOutcome, TfReport, TfStatus};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_tf(report: &TfReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_run(report: &RunReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_tfs(tfs: &[String]) -> io::Result<()> {
        Self::print_json(&tfs)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_tf(report: &TfReport) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write_tf(&mut stdout, report)
    }

    pub fn print_run(report: &RunReport) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for outcome in &report.outcomes {
            match outcome {
                TfOutcome::Completed(tf) => write_tf(&mut stdout, tf)?,
                TfOutcome::Failed { tf, error } => writeln!(stdout, "{tf}: failed: {error}")?,
            }
        }
        let failed = report.failed().count();
        writeln!(
            stdout,
            "{} transcription factors, {} failed",
            report.outcomes.len(),
            failed
        )
    }

    pub fn print_tfs(tfs: &[String]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for tf in tfs {
            writeln!(stdout, "{tf}")?;
        }
        Ok(())
    }
}

pub fn write_tf<W: Write>(out: &mut W, report: &TfReport) -> io::Result<()> {
    match report.status {
        TfStatus::Written => writeln!(
            out,
            "{}: {} rows -> {}",
            report.tf,
            report.rows_written,
            report.output_path.as_deref().unwrap_or("-")
        )?,
        TfStatus::NoReplicates => writeln!(out, "{}: 0 replicates found", report.tf)?,
        TfStatus::NoResults => writeln!(out, "{}: no results found for any replicate", report.tf)?,
    }
    for replicate in &report.replicates {
        let detail = match &replicate.status {
            ReplicateStatus::Joined { motifs, rows } => format!("{motifs} motifs, {rows} rows"),
            ReplicateStatus::NoMotifs => "no motif files".to_string(),
            ReplicateStatus::Failed { error } => format!("failed: {error}"),
        };
        writeln!(
            out,
            "  {} ({}): {detail}",
            replicate.replicate, replicate.sample_id
        )?;
    }
    Ok(())
}
