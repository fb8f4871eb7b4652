//! Shared helpers for moving between polars columns and plain vectors.
//!
//! The statistics in [`crate::stats`] work on `&[f64]` slices; these helpers
//! pull the values out of a [`DataFrame`] and report missing or mistyped
//! columns with the crate's error type.

use crate::error::{EdaError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of the numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Look up a column, mapping polars' lookup failure to [`EdaError::ColumnNotFound`].
pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Values of a numeric column as `f64`, nulls preserved as `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = column(df, name)?;
    if !is_numeric_dtype(col.dtype()) {
        return Err(EdaError::NotNumeric {
            column: name.to_string(),
            dtype: col.dtype().to_string(),
        });
    }

    let float_series = col.as_materialized_series().cast(&DataType::Float64)?;
    let values = float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Non-null values of a numeric column.
pub fn non_null_numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(numeric_values(df, name)?.into_iter().flatten().collect())
}

/// Values of any column rendered as text labels, nulls preserved as `None`.
pub fn label_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = column(df, name)?;
    let str_series = col.as_materialized_series().cast(&DataType::String)?;
    let values = str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

// =============================================================================
// Formatting
// =============================================================================

/// Truncate a string to max length with ellipsis.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Turn a column name into a file-name fragment.
pub fn file_safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_numeric_column_names_keeps_order() {
        let df = df![
            "Id" => [1i64, 2, 3],
            "Street" => ["Pave", "Grvl", "Pave"],
            "LotArea" => [8450.0, 9600.0, 11250.0],
        ]
        .unwrap();

        assert_eq!(numeric_column_names(&df), vec!["Id", "LotArea"]);
    }

    #[test]
    fn test_numeric_values_preserves_nulls() {
        let df = df![
            "LotFrontage" => [Some(65i64), None, Some(68)],
        ]
        .unwrap();

        let values = numeric_values(&df, "LotFrontage").unwrap();
        assert_eq!(values, vec![Some(65.0), None, Some(68.0)]);
        assert_eq!(
            non_null_numeric_values(&df, "LotFrontage").unwrap(),
            vec![65.0, 68.0]
        );
    }

    #[test]
    fn test_numeric_values_rejects_text() {
        let df = df!["Street" => ["Pave", "Grvl"]].unwrap();
        let err = numeric_values(&df, "Street").unwrap_err();
        assert_eq!(err.error_code(), "NOT_NUMERIC");
    }

    #[test]
    fn test_missing_column() {
        let df = df!["a" => [1i64]].unwrap();
        let err = numeric_values(&df, "b").unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_label_values_from_integers() {
        let df = df!["OverallQual" => [Some(7i64), None, Some(5)]].unwrap();
        let labels = label_values(&df, "OverallQual").unwrap();
        assert_eq!(
            labels,
            vec![Some("7".to_string()), None, Some("5".to_string())]
        );
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("GrLivArea", 19), "GrLivArea");
        assert_eq!(truncate_str("BsmtFinType2Something", 10), "BsmtFin...");
    }

    #[test]
    fn test_file_safe_name() {
        assert_eq!(file_safe_name("1stFlrSF"), "1stflrsf");
        assert_eq!(file_safe_name("Garage Area"), "garage_area");
    }
}
