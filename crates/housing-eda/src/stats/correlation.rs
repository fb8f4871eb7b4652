//! Pearson correlation between columns and across the numeric table.

use crate::error::Result;
use crate::utils::{numeric_column_names, numeric_values};
use polars::prelude::cov::pearson_corr;
use polars::prelude::{DataFrame, Float64Chunked, NewChunkedArray};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Pearson correlation over the rows where both values are present.
///
/// Returns `None` with fewer than two complete pairs or when either side has
/// zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    pearson_pairs(&pairs)
}

/// Pearson correlation of complete `(x, y)` pairs.
pub fn pearson_pairs(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2
        || is_constant(pairs.iter().map(|(x, _)| *x))
        || is_constant(pairs.iter().map(|(_, y)| *y))
    {
        return None;
    }

    let xs = Float64Chunked::from_iter_values("x".into(), pairs.iter().map(|(x, _)| *x));
    let ys = Float64Chunked::from_iter_values("y".into(), pairs.iter().map(|(_, y)| *y));

    pearson_corr(&xs, &ys)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// A feature ranked by its correlation with the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCorrelation {
    pub feature: String,
    pub r: f64,
}

/// Two features that move together closely enough to carry the same
/// information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollinearPair {
    pub first: String,
    pub second: String,
    pub r: f64,
}

/// Symmetric matrix of pairwise Pearson correlations.
///
/// `values[i][j]` is `None` where the correlation is undefined; the diagonal
/// is always 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlate every numeric column of the table.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let columns = numeric_column_names(df);
        let data = columns
            .iter()
            .map(|name| numeric_values(df, name))
            .collect::<Result<Vec<_>>>()?;

        debug!("Computing correlation matrix over {} numeric columns", columns.len());
        Ok(Self::from_columns(columns, &data))
    }

    /// Build the matrix from already extracted columns.
    pub fn from_columns(columns: Vec<String>, data: &[Vec<Option<f64>>]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![None; n]; n];

        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let r = pearson(&data[i], &data[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self { columns, values }
    }

    /// Get the correlation between two columns.
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.index_of(first)?;
        let j = self.index_of(second)?;
        self.values[i][j]
    }

    /// Get the matrix dimensions.
    pub fn shape(&self) -> (usize, usize) {
        (
            self.values.len(),
            self.values.first().map(|v| v.len()).unwrap_or(0),
        )
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Features sorted by absolute correlation with `target`, strongest first.
    ///
    /// The target itself and undefined correlations are left out.
    pub fn target_ranking(&self, target: &str, limit: usize) -> Vec<RankedCorrelation> {
        let Some(t) = self.index_of(target) else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedCorrelation> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .filter_map(|(i, name)| {
                self.values[t][i].map(|r| RankedCorrelation {
                    feature: name.clone(),
                    r,
                })
            })
            .collect();

        ranked.sort_by(|a, b| by_magnitude(a.r, b.r));
        ranked.truncate(limit);
        ranked
    }

    /// Feature pairs whose absolute correlation reaches `threshold`,
    /// strongest first. Pairs involving `exclude` (the target) are skipped.
    pub fn collinear_pairs(&self, threshold: f64, exclude: &str) -> Vec<CollinearPair> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            if self.columns[i] == exclude {
                continue;
            }
            for j in (i + 1)..self.columns.len() {
                if self.columns[j] == exclude {
                    continue;
                }
                if let Some(r) = self.values[i][j]
                    && r.abs() >= threshold
                {
                    pairs.push(CollinearPair {
                        first: self.columns[i].clone(),
                        second: self.columns[j].clone(),
                        r,
                    });
                }
            }
        }

        pairs.sort_by(|a, b| by_magnitude(a.r, b.r));
        pairs
    }

    /// Sub-matrix over the given columns, in the given order. Unknown names
    /// are skipped.
    pub fn select(&self, columns: &[String]) -> Self {
        let indices: Vec<usize> = columns.iter().filter_map(|c| self.index_of(c)).collect();
        let values = indices
            .iter()
            .map(|&i| indices.iter().map(|&j| self.values[i][j]).collect())
            .collect();

        Self {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            values,
        }
    }

    /// The target followed by the `k - 1` features most correlated with it.
    pub fn zoom_on_target(&self, target: &str, k: usize) -> Self {
        let mut columns = vec![target.to_string()];
        columns.extend(
            self.target_ranking(target, k.saturating_sub(1))
                .into_iter()
                .map(|ranked| ranked.feature),
        );
        self.select(&columns)
    }
}

fn by_magnitude(a: f64, b: f64) -> Ordering {
    b.abs().partial_cmp(&a.abs()).unwrap_or(Ordering::Equal)
}
