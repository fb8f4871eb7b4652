//! Configuration types for the exploratory analysis.
//!
//! This module provides configuration options using the builder pattern.
//! A configuration can also be read from a JSON file; missing keys fall back
//! to the defaults, so a file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Null markers recognised when reading the CSV.
pub const DEFAULT_NULL_VALUES: [&str; 17] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "n/a", "null",
];

/// Configuration for the analysis run.
///
/// Use [`EdaConfig::builder()`] to create a new configuration with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use housing_eda::config::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .target_column("SalePrice")
///     .missing_column_threshold(1)
///     .heatmap_vmax(0.8)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Path of the CSV file to analyse.
    /// Default: "train.csv"
    pub input: PathBuf,

    /// Column being explained.
    /// Default: "SalePrice"
    pub target_column: String,

    /// Candidates related to the target with a scatter plot and Pearson r.
    /// Default: GrLivArea, TotalBsmtSF
    pub numeric_features: Vec<String>,

    /// Candidates related to the target with per-category box plots.
    /// Default: OverallQual, YearBuilt
    pub categorical_features: Vec<String>,

    /// Columns with more missing values than this are dropped.
    /// Default: 1
    pub missing_column_threshold: usize,

    /// Columns whose missing values are expected to be handled by dropping
    /// rows. Any other column triggering a row drop is logged as a warning.
    /// Default: Electrical
    pub expected_row_drop_columns: Vec<String>,

    /// Number of entries shown from the ranked missing-data table.
    /// Default: 20
    pub missing_table_rows: usize,

    /// Number of features in the zoomed correlation heatmap.
    /// Default: 10
    pub top_correlated: usize,

    /// Upper clamp of the heatmap colour scale.
    /// Default: 0.8
    pub heatmap_vmax: f64,

    /// Absolute correlation at which two features are reported as collinear.
    /// Default: 0.8
    pub collinearity_threshold: f64,

    /// Upper bound of the price axis on scatter and box plots.
    /// Default: 800000
    pub price_axis_max: f64,

    /// Strings read as null.
    /// Default: [`DEFAULT_NULL_VALUES`]
    pub null_values: Vec<String>,

    /// Rows scanned to infer column types. `None` scans the whole file.
    /// Default: Some(10000)
    pub infer_schema_length: Option<usize>,

    /// Directory receiving rendered charts. `None` disables rendering.
    /// Default: None
    pub plot_dir: Option<PathBuf>,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("train.csv"),
            target_column: "SalePrice".to_string(),
            numeric_features: vec!["GrLivArea".to_string(), "TotalBsmtSF".to_string()],
            categorical_features: vec!["OverallQual".to_string(), "YearBuilt".to_string()],
            missing_column_threshold: 1,
            expected_row_drop_columns: vec!["Electrical".to_string()],
            missing_table_rows: 20,
            top_correlated: 10,
            heatmap_vmax: 0.8,
            collinearity_threshold: 0.8,
            price_axis_max: 800_000.0,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            infer_schema_length: Some(10_000),
            plot_dir: None,
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EdaConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Start a builder pre-filled with this configuration's values.
    pub fn to_builder(&self) -> EdaConfigBuilder {
        EdaConfigBuilder {
            input: Some(self.input.clone()),
            target_column: Some(self.target_column.clone()),
            numeric_features: Some(self.numeric_features.clone()),
            categorical_features: Some(self.categorical_features.clone()),
            missing_column_threshold: Some(self.missing_column_threshold),
            expected_row_drop_columns: Some(self.expected_row_drop_columns.clone()),
            missing_table_rows: Some(self.missing_table_rows),
            top_correlated: Some(self.top_correlated),
            heatmap_vmax: Some(self.heatmap_vmax),
            collinearity_threshold: Some(self.collinearity_threshold),
            price_axis_max: Some(self.price_axis_max),
            null_values: Some(self.null_values.clone()),
            infer_schema_length: Some(self.infer_schema_length),
            plot_dir: self.plot_dir.clone(),
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.target_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTarget);
        }

        for (field, value) in [
            ("heatmap_vmax", self.heatmap_vmax),
            ("collinearity_threshold", self.collinearity_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigValidationError::InvalidCorrelationBound {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("missing_table_rows", self.missing_table_rows),
            ("top_correlated", self.top_correlated),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        if !(self.price_axis_max.is_finite() && self.price_axis_max > 0.0) {
            return Err(ConfigValidationError::InvalidAxis(self.price_axis_max));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Target column name must not be empty")]
    EmptyTarget,

    #[error("Invalid value for '{field}': {value} (must be in (0.0, 1.0])")]
    InvalidCorrelationBound { field: String, value: f64 },

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),

    #[error("Invalid price axis maximum: {0} (must be a positive number)")]
    InvalidAxis(f64),
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    input: Option<PathBuf>,
    target_column: Option<String>,
    numeric_features: Option<Vec<String>>,
    categorical_features: Option<Vec<String>>,
    missing_column_threshold: Option<usize>,
    expected_row_drop_columns: Option<Vec<String>>,
    missing_table_rows: Option<usize>,
    top_correlated: Option<usize>,
    heatmap_vmax: Option<f64>,
    collinearity_threshold: Option<f64>,
    price_axis_max: Option<f64>,
    null_values: Option<Vec<String>>,
    infer_schema_length: Option<Option<usize>>,
    plot_dir: Option<PathBuf>,
}

impl EdaConfigBuilder {
    /// Set the CSV file to analyse.
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Set the target column.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Set the numeric candidate features.
    pub fn numeric_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Set the categorical candidate features.
    pub fn categorical_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    /// Set the missing-count threshold above which a column is dropped.
    ///
    /// # Arguments
    /// * `threshold` - Absolute number of missing values (e.g., 1)
    pub fn missing_column_threshold(mut self, threshold: usize) -> Self {
        self.missing_column_threshold = Some(threshold);
        self
    }

    /// Set the columns expected to lose rows rather than be dropped.
    pub fn expected_row_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_row_drop_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many entries of the missing-data table are shown.
    pub fn missing_table_rows(mut self, rows: usize) -> Self {
        self.missing_table_rows = Some(rows);
        self
    }

    /// Set the size of the zoomed correlation heatmap.
    pub fn top_correlated(mut self, k: usize) -> Self {
        self.top_correlated = Some(k);
        self
    }

    /// Set the heatmap colour clamp.
    pub fn heatmap_vmax(mut self, vmax: f64) -> Self {
        self.heatmap_vmax = Some(vmax);
        self
    }

    /// Set the absolute correlation reported as collinear.
    pub fn collinearity_threshold(mut self, threshold: f64) -> Self {
        self.collinearity_threshold = Some(threshold);
        self
    }

    /// Set the upper bound of the price axis.
    pub fn price_axis_max(mut self, max: f64) -> Self {
        self.price_axis_max = Some(max);
        self
    }

    /// Set the strings read as null.
    pub fn null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many rows are scanned for type inference (`None` = all).
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Render charts into this directory.
    pub fn plot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plot_dir = Some(dir.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();
        let config = EdaConfig {
            input: self.input.unwrap_or(defaults.input),
            target_column: self.target_column.unwrap_or(defaults.target_column),
            numeric_features: self.numeric_features.unwrap_or(defaults.numeric_features),
            categorical_features: self
                .categorical_features
                .unwrap_or(defaults.categorical_features),
            missing_column_threshold: self
                .missing_column_threshold
                .unwrap_or(defaults.missing_column_threshold),
            expected_row_drop_columns: self
                .expected_row_drop_columns
                .unwrap_or(defaults.expected_row_drop_columns),
            missing_table_rows: self
                .missing_table_rows
                .unwrap_or(defaults.missing_table_rows),
            top_correlated: self.top_correlated.unwrap_or(defaults.top_correlated),
            heatmap_vmax: self.heatmap_vmax.unwrap_or(defaults.heatmap_vmax),
            collinearity_threshold: self
                .collinearity_threshold
                .unwrap_or(defaults.collinearity_threshold),
            price_axis_max: self.price_axis_max.unwrap_or(defaults.price_axis_max),
            null_values: self.null_values.unwrap_or(defaults.null_values),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            plot_dir: self.plot_dir,
        };

        config.validate()?;
        Ok(config)
    }
}
