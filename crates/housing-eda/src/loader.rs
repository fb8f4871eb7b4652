//! CSV loading for the training table.
//!
//! The house-prices file spells missing values as `NA`, so the reader is
//! configured with an explicit list of null markers. Loading first infers
//! column types from a bounded prefix of the file; if that fails (a column
//! that looked integral turns out to hold decimals further down, say) it
//! retries with whole-file inference.

use crate::config::EdaConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::utils::is_numeric_dtype;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options controlling how the CSV is read and validated.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Column that must be present and numeric.
    pub target_column: String,
    /// Strings read as null.
    pub null_values: Vec<String>,
    /// Rows scanned for type inference on the first attempt.
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&EdaConfig::default())
    }
}

impl From<&EdaConfig> for LoadOptions {
    fn from(config: &EdaConfig) -> Self {
        Self {
            target_column: config.target_column.clone(),
            null_values: config.null_values.clone(),
            infer_schema_length: config.infer_schema_length,
        }
    }
}

/// Load the training table and check the target column.
pub fn load_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EdaError::FileNotFound(path.to_path_buf()));
    }

    info!("Loading dataset from: {}", path.display());
    let df = read_with_fallback(path, options)?;
    info!("Dataset loaded: {} rows x {} columns", df.height(), df.width());

    validate_target(&df, &options.target_column)?;
    Ok(df)
}

/// Ensure the target column exists and holds numbers.
///
/// A column without a single value has no inferred type to check, so an
/// empty or all-null target is reported as having no valid values.
pub fn validate_target(df: &DataFrame, target: &str) -> Result<()> {
    let col = df
        .column(target)
        .map_err(|_| EdaError::ColumnNotFound(target.to_string()))?;

    if col.null_count() == col.len() {
        return Err(EdaError::NoValidValues(target.to_string()));
    }

    if !is_numeric_dtype(col.dtype()) {
        return Err(EdaError::NotNumeric {
            column: target.to_string(),
            dtype: col.dtype().to_string(),
        });
    }
    Ok(())
}

fn read_with_fallback(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    match read_csv(path, options, options.infer_schema_length) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Bounded schema inference failed: {}", e);
        }
    }

    read_csv(path, options, None)
        .context(format!("Failed to parse CSV file {}", path.display()))
}

fn read_csv(
    path: &Path,
    options: &LoadOptions,
    infer_schema_length: Option<usize>,
) -> PolarsResult<DataFrame> {
    let null_values: Vec<PlSmallStr> = options
        .null_values
        .iter()
        .map(|s| s.as_str().into())
        .collect();

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(NullValues::AllColumns(null_values))),
        )
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}
