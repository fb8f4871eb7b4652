//! Univariate summary of the target column.

use crate::error::{EdaError, Result};
use crate::utils::non_null_numeric_values;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading of a skewness coefficient.
///
/// |s| <= 0.5 is fairly symmetrical, 0.5 < |s| <= 1 moderately skewed,
/// anything beyond highly skewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewnessClass {
    FairlySymmetrical,
    ModeratelySkewed,
    HighlySkewed,
}

impl SkewnessClass {
    pub fn classify(skewness: f64) -> Self {
        let magnitude = skewness.abs();
        if magnitude <= 0.5 {
            SkewnessClass::FairlySymmetrical
        } else if magnitude <= 1.0 {
            SkewnessClass::ModeratelySkewed
        } else {
            SkewnessClass::HighlySkewed
        }
    }
}

impl fmt::Display for SkewnessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkewnessClass::FairlySymmetrical => "fairly symmetrical",
            SkewnessClass::ModeratelySkewed => "moderately skewed",
            SkewnessClass::HighlySkewed => "highly skewed",
        };
        f.write_str(text)
    }
}

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
    /// Adjusted Fisher-Pearson skewness; absent below 3 values.
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis; absent below 4 values.
    pub kurtosis: Option<f64>,
    pub skew_class: Option<SkewnessClass>,
}

impl TargetSummary {
    /// Summarize a numeric column of the table, ignoring nulls.
    pub fn of_column(df: &DataFrame, column: &str) -> Result<Self> {
        let values = non_null_numeric_values(df, column)?;
        Self::from_values(column, &values)
    }

    /// Summarize a slice of values.
    pub fn from_values(column: &str, values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(EdaError::NoValidValues(column.to_string()));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let skewness = skewness(values);
        Ok(Self {
            column: column.to_string(),
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.50),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            skewness,
            kurtosis: kurtosis(values),
            skew_class: skewness.map(SkewnessClass::classify),
        })
    }
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0.0 below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }

    let mean = mean(values);
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Quantile of an ascending slice with linear interpolation between order
/// statistics.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Sums of squared, cubed and fourth-power deviations from the mean.
fn central_sums(values: &[f64]) -> (f64, f64, f64) {
    let mean = mean(values);
    values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), v| {
        let d = v - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    })
}

/// Adjusted Fisher-Pearson skewness (the third standardized moment with the
/// small-sample correction).
///
/// `None` below three values; zero when every value is equal.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 3 {
        return None;
    }

    let (m2, m3, _) = central_sums(values);
    if m2 <= f64::EPSILON * n {
        return Some(0.0);
    }

    Some(n * (n - 1.0).sqrt() / (n - 2.0) * m3 / m2.powf(1.5))
}

/// Bias-corrected excess kurtosis.
///
/// `None` below four values; zero when every value is equal.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if values.len() < 4 {
        return None;
    }

    let (m2, _, m4) = central_sums(values);
    if m2 <= f64::EPSILON * n {
        return Some(0.0);
    }

    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Some(numerator / denominator - adjustment)
}
