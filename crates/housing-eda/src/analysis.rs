//! Runs every stage of the exploratory analysis in order.

use crate::config::EdaConfig;
use crate::error::{Result, ResultExt};
use crate::missing::{CleaningOutcome, MissingDataCleaner, MissingReport};
use crate::plot::{ChartRenderer, render_all};
use crate::stats::{
    CollinearPair, CorrelationMatrix, FeatureKind, RankedCorrelation, Relationship, TargetSummary,
};
use crate::utils::non_null_numeric_values;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Everything the analysis produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// `(rows, columns)` of the table as loaded.
    pub original_shape: (usize, usize),
    pub summary: TargetSummary,
    pub relationships: Vec<Relationship>,
    pub correlation: CorrelationMatrix,
    pub top_correlated: Vec<RankedCorrelation>,
    pub collinear_pairs: Vec<CollinearPair>,
    pub missing: MissingReport,
    pub cleaning: CleaningOutcome,
    /// Charts written to disk; empty when no plot directory was configured.
    pub charts: Vec<PathBuf>,
    /// The table after the missing-data rule.
    pub cleaned: DataFrame,
}

/// Exploratory analysis driven by an [`EdaConfig`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: EdaConfig,
}

impl Analyzer {
    pub fn new(config: EdaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// Analyse a loaded table.
    pub fn run(&self, df: DataFrame) -> Result<AnalysisOutput> {
        let config = &self.config;
        let target = config.target_column.as_str();
        let original_shape = df.shape();

        info!("Step 1: Describing '{}'...", target);
        let target_values = non_null_numeric_values(&df, target)?;
        let summary = TargetSummary::from_values(target, &target_values)?;
        match summary.skewness {
            Some(skew) => info!(
                "Skewness of '{}': {:.6} ({})",
                target,
                skew,
                summary.skew_class.map(|c| c.to_string()).unwrap_or_default()
            ),
            None => warn!("Too few values in '{}' to measure skewness", target),
        }

        info!("Step 2: Relating candidate features to '{}'...", target);
        let relationships = self.relationships(&df)?;

        info!("Step 3: Computing correlation matrix...");
        let correlation = CorrelationMatrix::compute(&df)?;
        let top_correlated = correlation.target_ranking(target, config.top_correlated);
        let collinear_pairs = correlation.collinear_pairs(config.collinearity_threshold, target);
        debug!(
            "{} numeric columns, {} collinear pairs at |r| >= {}",
            correlation.columns.len(),
            collinear_pairs.len(),
            config.collinearity_threshold
        );

        let charts = match &config.plot_dir {
            Some(dir) => {
                let renderer = ChartRenderer::from_config(config, dir)?;
                render_all(
                    &renderer,
                    &summary,
                    &target_values,
                    &relationships,
                    &correlation,
                    config.top_correlated,
                )?
            }
            None => Vec::new(),
        };

        info!("Step 4: Auditing missing data...");
        let missing = MissingReport::audit(&df);
        debug!("{} columns have missing values", missing.with_missing().count());

        let cleaner = MissingDataCleaner::from(config);
        let (cleaned, cleaning) = cleaner
            .clean(df, &missing)
            .context("Failed to apply missing-data rule")?;

        info!(
            "Analysis complete: {:?} -> {:?}",
            original_shape,
            cleaned.shape()
        );

        Ok(AnalysisOutput {
            original_shape,
            summary,
            relationships,
            correlation,
            top_correlated,
            collinear_pairs,
            missing,
            cleaning,
            charts,
            cleaned,
        })
    }

    fn relationships(&self, df: &DataFrame) -> Result<Vec<Relationship>> {
        let target = self.config.target_column.as_str();
        let numeric = self
            .config
            .numeric_features
            .iter()
            .map(|f| (f, FeatureKind::Numeric));
        let categorical = self
            .config
            .categorical_features
            .iter()
            .map(|f| (f, FeatureKind::Categorical));

        numeric
            .chain(categorical)
            .map(|(feature, kind)| -> Result<Relationship> {
                let relationship = Relationship::between(df, target, feature, kind)
                    .context(format!("Failed to relate '{}' to '{}'", feature, target))?;
                if let Some(r) = relationship.pearson() {
                    info!("corr({}, {}) = {:.6}", feature, target, r);
                } else {
                    debug!("{} relationship with '{}'", kind, feature);
                }
                Ok(relationship)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn frame() -> DataFrame {
        df![
            "SalePrice" => [208500.0, 181500.0, 223500.0, 140000.0, 250000.0, 143000.0],
            "GrLivArea" => [1710i64, 1262, 1786, 1717, 2198, 1362],
            "TotalBsmtSF" => [856i64, 1262, 920, 756, 1145, 796],
            "OverallQual" => [7i64, 6, 7, 7, 8, 5],
            "YearBuilt" => [2003i64, 1976, 2001, 1915, 2000, 1993],
            "Electrical" => [Some("SBrkr"), Some("SBrkr"), None, Some("SBrkr"), Some("SBrkr"), Some("SBrkr")],
            "PoolQC" => [None::<&str>, None, None, None, Some("Ex"), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_run_without_plots() {
        let analyzer = Analyzer::new(EdaConfig::default());
        let output = analyzer.run(frame()).unwrap();

        assert_eq!(output.original_shape, (6, 7));
        assert_eq!(output.summary.count, 6);
        assert_eq!(output.relationships.len(), 4);
        assert_eq!(output.relationships[0].feature(), "GrLivArea");
        assert_eq!(output.relationships[2].kind(), FeatureKind::Categorical);
        assert_eq!(output.correlation.columns.len(), 5);
        assert!(output.charts.is_empty());

        assert_eq!(output.cleaning.dropped_columns, vec!["PoolQC".to_string()]);
        assert_eq!(output.cleaned.shape(), (5, 6));
        assert_eq!(output.cleaning.remaining_missing, 0);
    }

    #[test]
    fn test_run_reports_missing_feature() {
        let config = EdaConfig::builder()
            .numeric_features(["GarageArea"])
            .build()
            .unwrap();
        let err = Analyzer::new(config).run(frame()).unwrap_err();

        assert!(err.is_missing_column());
    }

    #[test]
    fn test_top_correlated_respects_limit() {
        let config = EdaConfig::builder().top_correlated(2).build().unwrap();
        let output = Analyzer::new(config).run(frame()).unwrap();

        assert_eq!(output.top_correlated.len(), 2);
        assert!(output.top_correlated.iter().all(|r| r.feature != "SalePrice"));
    }
}
