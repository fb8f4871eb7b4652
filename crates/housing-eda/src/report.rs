//! Serializable report of a finished analysis.

use crate::analysis::AnalysisOutput;
use crate::error::Result;
use crate::missing::{CleaningOutcome, MissingEntry};
use crate::stats::{CollinearPair, CorrelationMatrix, RankedCorrelation, Relationship, TargetSummary};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Correlation findings kept in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    /// Number of numeric columns in the matrix.
    pub numeric_columns: usize,
    /// Features most correlated with the target, strongest first.
    pub top_correlated: Vec<RankedCorrelation>,
    /// Feature pairs correlated strongly enough to be redundant.
    pub collinear_pairs: Vec<CollinearPair>,
    /// Full matrix; `null` where undefined.
    pub matrix: CorrelationMatrix,
}

/// Complete report for `--json` output and `--emit-report` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// `(rows, columns)` as loaded
    pub original_shape: (usize, usize),
    /// `(rows, columns)` after the missing-data rule
    pub final_shape: (usize, usize),
    pub target: TargetSummary,
    pub relationships: Vec<Relationship>,
    pub correlation: CorrelationSummary,
    /// Columns missing at least one value, most missing first
    pub missing: Vec<MissingEntry>,
    pub cleaning: CleaningOutcome,
    /// Charts written during the run
    pub charts: Vec<String>,
}

impl EdaReport {
    pub fn build(input_file: impl AsRef<Path>, output: &AnalysisOutput) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.as_ref().display().to_string(),
            original_shape: output.original_shape,
            final_shape: output.cleaned.shape(),
            target: output.summary.clone(),
            relationships: output.relationships.clone(),
            correlation: CorrelationSummary {
                numeric_columns: output.correlation.columns.len(),
                top_correlated: output.top_correlated.clone(),
                collinear_pairs: output.collinear_pairs.clone(),
                matrix: output.correlation.clone(),
            },
            missing: output.missing.with_missing().cloned().collect(),
            cleaning: output.cleaning.clone(),
            charts: output
                .charts
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as `<stem>_eda_report.json` inside `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>, stem: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{}_eda_report.json", stem));
        let mut file = File::create(&path)?;
        file.write_all(self.to_json_pretty()?.as_bytes())?;

        info!("Report saved: {}", path.display());
        Ok(path)
    }
}
