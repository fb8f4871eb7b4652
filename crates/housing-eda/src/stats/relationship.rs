//! Relationship between the target and one candidate feature.
//!
//! Numeric candidates get a Pearson coefficient and the scatter points;
//! categorical ones get the target's distribution per category, ready for a
//! box plot.

use super::correlation::pearson_pairs;
use super::describe::quantile_sorted;
use crate::error::Result;
use crate::utils::{column, is_numeric_dtype, label_values, numeric_values};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a candidate feature is related to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Numeric => f.write_str("numeric"),
            FeatureKind::Categorical => f.write_str("categorical"),
        }
    }
}

/// Five-number summary with 1.5 * IQR whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value not below `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v))
            .collect();
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker: inside.first().copied().unwrap_or(q1),
            upper_whisker: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// Target distribution within one category of the feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub label: String,
    pub stats: BoxStats,
}

/// Result of relating the target to one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relationship {
    Numeric {
        feature: String,
        target: String,
        /// `None` when undefined (constant column or fewer than two rows).
        pearson: Option<f64>,
        /// `(feature, target)` points; kept out of serialized reports.
        #[serde(skip)]
        points: Vec<(f64, f64)>,
    },
    Categorical {
        feature: String,
        target: String,
        groups: Vec<CategoryGroup>,
    },
}

impl Relationship {
    /// Relate `target` to `feature` according to `kind`.
    pub fn between(df: &DataFrame, target: &str, feature: &str, kind: FeatureKind) -> Result<Self> {
        let target_values = numeric_values(df, target)?;
        match kind {
            FeatureKind::Numeric => {
                let feature_values = numeric_values(df, feature)?;
                let points: Vec<(f64, f64)> = feature_values
                    .iter()
                    .zip(target_values.iter())
                    .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                    .collect();

                Ok(Relationship::Numeric {
                    feature: feature.to_string(),
                    target: target.to_string(),
                    pearson: pearson_pairs(&points),
                    points,
                })
            }
            FeatureKind::Categorical => {
                let numeric_labels = is_numeric_dtype(column(df, feature)?.dtype());
                let labels = label_values(df, feature)?;
                Ok(Relationship::Categorical {
                    feature: feature.to_string(),
                    target: target.to_string(),
                    groups: group_by_label(&labels, &target_values, numeric_labels),
                })
            }
        }
    }

    pub fn feature(&self) -> &str {
        match self {
            Relationship::Numeric { feature, .. } | Relationship::Categorical { feature, .. } => {
                feature
            }
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Relationship::Numeric { .. } => FeatureKind::Numeric,
            Relationship::Categorical { .. } => FeatureKind::Categorical,
        }
    }

    /// Pearson coefficient, for numeric relationships.
    pub fn pearson(&self) -> Option<f64> {
        match self {
            Relationship::Numeric { pearson, .. } => *pearson,
            Relationship::Categorical { .. } => None,
        }
    }
}

/// Group target values by label. Rows missing either side are skipped.
///
/// Groups are ordered by numeric value when the labels came from a numeric
/// column (so "10" follows "9"), lexicographically otherwise.
fn group_by_label(
    labels: &[Option<String>],
    target: &[Option<f64>],
    numeric_labels: bool,
) -> Vec<CategoryGroup> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (label, value) in labels.iter().zip(target.iter()) {
        if let (Some(label), Some(value)) = (label, value) {
            buckets.entry(label.clone()).or_default().push(*value);
        }
    }

    let mut groups: Vec<CategoryGroup> = buckets
        .into_iter()
        .filter_map(|(label, values)| {
            BoxStats::from_values(&values).map(|stats| CategoryGroup { label, stats })
        })
        .collect();

    if numeric_labels {
        groups.sort_by(|a, b| {
            let a = a.label.parse::<f64>().unwrap_or(f64::NAN);
            let b = b.label.parse::<f64>().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        });
    }
    groups
}
