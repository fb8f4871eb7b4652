//! Missing-data audit and the column/row drop rule.
//!
//! The audit ranks columns by how many values they are missing. Cleaning
//! then drops every column missing more than a fixed number of values and
//! removes the few rows still holding a null, so nothing missing survives.
//! The threshold is a decision made by looking at this dataset's missing
//! profile, not a general rule.

use crate::config::EdaConfig;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Missing values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub column: String,
    pub total: usize,
    /// `total / rows`, in [0, 1].
    pub percent: f64,
}

/// Per-column missing counts, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingReport {
    pub rows: usize,
    pub entries: Vec<MissingEntry>,
}

impl MissingReport {
    /// Count nulls in every column. Ties keep table order.
    pub fn audit(df: &DataFrame) -> Self {
        let rows = df.height();
        let mut entries: Vec<MissingEntry> = df
            .get_columns()
            .iter()
            .map(|col| {
                let total = col.null_count();
                let percent = if rows > 0 {
                    total as f64 / rows as f64
                } else {
                    0.0
                };
                MissingEntry {
                    column: col.name().to_string(),
                    total,
                    percent,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.total.cmp(&a.total));
        Self { rows, entries }
    }

    /// The `n` columns missing the most values.
    pub fn head(&self, n: usize) -> &[MissingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Columns missing at least one value.
    pub fn with_missing(&self) -> impl Iterator<Item = &MissingEntry> {
        self.entries.iter().filter(|e| e.total > 0)
    }

    /// Largest missing count of any column; 0 means the table is complete.
    pub fn max_missing(&self) -> usize {
        self.entries.first().map(|e| e.total).unwrap_or(0)
    }

    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|e| e.column == column)
    }
}

/// What the cleaning rule removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningOutcome {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns removed because they missed more than the threshold.
    pub dropped_columns: Vec<String>,
    /// Number of rows removed.
    pub dropped_rows: usize,
    /// Surviving columns whose nulls caused rows to be removed.
    pub row_drop_columns: Vec<String>,
    /// Row-drop columns that were not expected to need it.
    pub unexpected_row_drop_columns: Vec<String>,
    /// Largest per-column null count after cleaning.
    pub remaining_missing: usize,
}

/// Applies the fixed missing-data rule.
#[derive(Debug, Clone)]
pub struct MissingDataCleaner {
    /// Columns missing more than this many values are dropped.
    pub column_threshold: usize,
    /// Never dropped as a column; its null rows are removed instead.
    pub target_column: String,
    /// Columns expected to be handled by removing rows.
    pub expected_row_drop_columns: Vec<String>,
}

impl From<&EdaConfig> for MissingDataCleaner {
    fn from(config: &EdaConfig) -> Self {
        Self {
            column_threshold: config.missing_column_threshold,
            target_column: config.target_column.clone(),
            expected_row_drop_columns: config.expected_row_drop_columns.clone(),
        }
    }
}

impl MissingDataCleaner {
    /// Drop high-missing columns, then rows holding any remaining null.
    pub fn clean(&self, df: DataFrame, report: &MissingReport) -> Result<(DataFrame, CleaningOutcome)> {
        let rows_before = df.height();
        let columns_before = df.width();
        let mut df = df;

        info!(
            "Dropping columns with more than {} missing value(s)",
            self.column_threshold
        );

        // 1. Remove columns over the threshold
        let dropped_columns: Vec<String> = report
            .entries
            .iter()
            .filter(|e| e.total > self.column_threshold && e.column != self.target_column)
            .filter(|e| df.column(&e.column).is_ok())
            .map(|e| e.column.clone())
            .collect();

        if !dropped_columns.is_empty() {
            let names: Vec<PlSmallStr> = dropped_columns
                .iter()
                .map(|s| s.as_str().into())
                .collect();
            df = df.drop_many(names);
            debug!("Dropped {} columns: {:?}", dropped_columns.len(), dropped_columns);
        }

        // 2. Remove rows with nulls in the surviving columns
        let row_drop_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| col.name().to_string())
            .collect();

        let unexpected_row_drop_columns: Vec<String> = row_drop_columns
            .iter()
            .filter(|c| **c != self.target_column && !self.expected_row_drop_columns.contains(c))
            .cloned()
            .collect();
        if !unexpected_row_drop_columns.is_empty() {
            warn!(
                "Rows dropped for columns not expected to need it: {:?}",
                unexpected_row_drop_columns
            );
        }

        if !row_drop_columns.is_empty() {
            let mut mask = BooleanChunked::full("keep".into(), true, df.height());
            for name in &row_drop_columns {
                let present = df.column(name)?.as_materialized_series().is_not_null();
                mask = &mask & &present;
            }
            df = df.filter(&mask)?;
            debug!("Dropped rows with missing {:?}", row_drop_columns);
        }

        let remaining_missing = df
            .get_columns()
            .iter()
            .map(|col| col.null_count())
            .max()
            .unwrap_or(0);

        let outcome = CleaningOutcome {
            rows_before,
            rows_after: df.height(),
            columns_before,
            columns_after: df.width(),
            dropped_rows: rows_before - df.height(),
            dropped_columns,
            row_drop_columns,
            unexpected_row_drop_columns,
            remaining_missing,
        };

        info!(
            "Cleaning removed {} columns and {} rows; max remaining missing: {}",
            outcome.dropped_columns.len(),
            outcome.dropped_rows,
            outcome.remaining_missing
        );

        Ok((df, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cleaner() -> MissingDataCleaner {
        MissingDataCleaner::from(&EdaConfig::default())
    }

    #[test]
    fn test_audit_sorts_descending_and_keeps_ties_in_order() {
        let df = df![
            "Id" => [1i64, 2, 3, 4],
            "Alley" => [None::<&str>, None, None, Some("Grvl")],
            "Fence" => [None, Some("MnPrv"), None, Some("GdWo")],
            "FireplaceQu" => [Some("Gd"), None, Some("TA"), None],
        ]
        .unwrap();

        let report = MissingReport::audit(&df);
        let order: Vec<&str> = report.entries.iter().map(|e| e.column.as_str()).collect();

        assert_eq!(order, vec!["Alley", "Fence", "FireplaceQu", "Id"]);
        assert_eq!(report.get("Alley").unwrap().total, 3);
        assert_eq!(report.get("Alley").unwrap().percent, 0.75);
        assert_eq!(report.max_missing(), 3);
        assert_eq!(report.with_missing().count(), 3);
        assert_eq!(report.head(2).len(), 2);
        assert_eq!(report.head(10).len(), 4);
    }

    #[test]
    fn test_percent_is_fraction_of_rows() {
        let df = df![
            "a" => [Some(1i64), None, None, None, Some(5)],
            "b" => [Some(1i64), Some(2), Some(3), Some(4), Some(5)],
        ]
        .unwrap();

        let report = MissingReport::audit(&df);
        for entry in &report.entries {
            assert_eq!(entry.percent, entry.total as f64 / 5.0);
            assert!((0.0..=1.0).contains(&entry.percent));
        }
    }

    #[test]
    fn test_audit_empty_table() {
        let df = DataFrame::empty();
        let report = MissingReport::audit(&df);
        assert_eq!(report.rows, 0);
        assert_eq!(report.max_missing(), 0);
    }

    #[test]
    fn test_clean_drops_columns_over_threshold() {
        let df = df![
            "SalePrice" => [1.0, 2.0, 3.0, 4.0],
            "PoolQC" => [None::<&str>, None, None, Some("Ex")],
            "LotArea" => [1i64, 2, 3, 4],
        ]
        .unwrap();
        let report = MissingReport::audit(&df);

        let (cleaned, outcome) = cleaner().clean(df, &report).unwrap();

        assert_eq!(outcome.dropped_columns, vec!["PoolQC".to_string()]);
        assert_eq!(cleaned.width(), 2);
        assert_eq!(cleaned.height(), 4);
        assert_eq!(outcome.dropped_rows, 0);
        assert_eq!(outcome.remaining_missing, 0);
    }

    #[test]
    fn test_clean_single_missing_electrical_drops_row_only() {
        let df = df![
            "SalePrice" => [10.0, 20.0, 30.0],
            "Electrical" => [Some("SBrkr"), None, Some("FuseA")],
        ]
        .unwrap();
        let report = MissingReport::audit(&df);

        let (cleaned, outcome) = cleaner().clean(df, &report).unwrap();

        assert_eq!(cleaned.shape(), (2, 2));
        assert!(outcome.dropped_columns.is_empty());
        assert_eq!(outcome.row_drop_columns, vec!["Electrical".to_string()]);
        assert!(outcome.unexpected_row_drop_columns.is_empty());
        let prices: Vec<Option<f64>> = cleaned
            .column("SalePrice")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(prices, vec![Some(10.0), Some(30.0)]);
    }

    #[test]
    fn test_clean_flags_unexpected_row_drop_column() {
        let df = df![
            "SalePrice" => [10.0, 20.0, 30.0],
            "Utilities" => [Some("AllPub"), Some("AllPub"), None],
        ]
        .unwrap();
        let report = MissingReport::audit(&df);

        let (cleaned, outcome) = cleaner().clean(df, &report).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(outcome.unexpected_row_drop_columns, vec!["Utilities".to_string()]);
    }

    #[test]
    fn test_clean_never_drops_target_column() {
        let df = df![
            "SalePrice" => [Some(10.0), None, None, Some(40.0)],
            "LotArea" => [1i64, 2, 3, 4],
        ]
        .unwrap();
        let report = MissingReport::audit(&df);

        let (cleaned, outcome) = cleaner().clean(df, &report).unwrap();

        assert!(cleaned.column("SalePrice").is_ok());
        assert_eq!(cleaned.height(), 2);
        assert!(outcome.dropped_columns.is_empty());
        assert!(outcome.unexpected_row_drop_columns.is_empty());
        assert_eq!(cleaned.column("SalePrice").unwrap().null_count(), 0);
    }

    #[test]
    fn test_clean_respects_custom_threshold() {
        let df = df![
            "SalePrice" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "MasVnrArea" => [Some(1.0), None, None, Some(4.0), Some(5.0)],
        ]
        .unwrap();
        let report = MissingReport::audit(&df);
        let cleaner = MissingDataCleaner {
            column_threshold: 2,
            ..cleaner()
        };

        let (cleaned, outcome) = cleaner.clean(df, &report).unwrap();

        assert!(outcome.dropped_columns.is_empty());
        assert_eq!(cleaned.height(), 3);
        assert_eq!(outcome.remaining_missing, 0);
    }
}
