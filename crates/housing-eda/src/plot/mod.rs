//! PNG charts for the analysis.
//!
//! Each chart module exposes a drawing function returning
//! `Result<(), Box<dyn Error>>` as plotters does; [`ChartRenderer`] owns the
//! output directory, names the files and turns drawing failures into
//! [`EdaError::Render`].

pub mod boxplot;
pub mod distribution;
pub mod heatmap;
pub mod scatter;

pub use distribution::{Histogram, normal_pdf};
pub use heatmap::heat_color;

use crate::config::EdaConfig;
use crate::error::{EdaError, Result};
use crate::stats::{CorrelationMatrix, Relationship, TargetSummary};
use crate::utils::file_safe_name;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes charts into one directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    out_dir: PathBuf,
    price_axis_max: f64,
    vmax: f64,
}

impl ChartRenderer {
    /// Create the renderer, creating `out_dir` if needed.
    pub fn new(out_dir: impl Into<PathBuf>, price_axis_max: f64, vmax: f64) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            price_axis_max,
            vmax,
        })
    }

    pub fn from_config(config: &EdaConfig, out_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(out_dir, config.price_axis_max, config.heatmap_vmax)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Histogram of the target with its normal fit.
    pub fn distribution(&self, summary: &TargetSummary, values: &[f64]) -> Result<PathBuf> {
        let file = format!("{}_distribution.png", file_safe_name(&summary.column));
        let path = self.out_dir.join(&file);
        distribution::draw_distribution(&path, summary, values)
            .map_err(|e| EdaError::render(file, e))?;
        self.rendered(path)
    }

    /// Scatter plot for numeric relationships, box plots for categorical ones.
    pub fn relationship(&self, relationship: &Relationship) -> Result<PathBuf> {
        match relationship {
            Relationship::Numeric {
                feature,
                target,
                pearson,
                points,
            } => {
                let file = format!("scatter_{}.png", file_safe_name(feature));
                let path = self.out_dir.join(&file);
                scatter::draw_scatter(&path, feature, target, points, *pearson, self.price_axis_max)
                    .map_err(|e| EdaError::render(file, e))?;
                self.rendered(path)
            }
            Relationship::Categorical {
                feature,
                target,
                groups,
            } => {
                let file = format!("boxplot_{}.png", file_safe_name(feature));
                let path = self.out_dir.join(&file);
                boxplot::draw_boxplot(&path, feature, target, groups, self.price_axis_max)
                    .map_err(|e| EdaError::render(file, e))?;
                self.rendered(path)
            }
        }
    }

    /// Heatmap of the full correlation matrix.
    pub fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> Result<PathBuf> {
        self.heatmap("correlation_heatmap.png", "Correlation matrix", matrix)
    }

    /// Heatmap of the target and the `k - 1` features closest to it.
    pub fn top_correlated_heatmap(
        &self,
        matrix: &CorrelationMatrix,
        target: &str,
        k: usize,
    ) -> Result<PathBuf> {
        let zoomed = matrix.zoom_on_target(target, k);
        let title = format!("Top {} correlated with {}", zoomed.columns.len(), target);
        self.heatmap(&format!("correlation_top_{}.png", k), &title, &zoomed)
    }

    fn heatmap(&self, file: &str, title: &str, matrix: &CorrelationMatrix) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        heatmap::draw_heatmap(&path, title, matrix, self.vmax)
            .map_err(|e| EdaError::render(file, e))?;
        self.rendered(path)
    }

    fn rendered(&self, path: PathBuf) -> Result<PathBuf> {
        debug!("Rendered {}", path.display());
        Ok(path)
    }
}

/// Render every chart of a finished analysis.
pub fn render_all(
    renderer: &ChartRenderer,
    summary: &TargetSummary,
    target_values: &[f64],
    relationships: &[Relationship],
    matrix: &CorrelationMatrix,
    top_k: usize,
) -> Result<Vec<PathBuf>> {
    info!("Rendering charts into {}", renderer.out_dir().display());

    let mut paths = vec![renderer.distribution(summary, target_values)?];
    for relationship in relationships {
        paths.push(renderer.relationship(relationship)?);
    }
    paths.push(renderer.correlation_heatmap(matrix)?);
    paths.push(renderer.top_correlated_heatmap(matrix, &summary.column, top_k)?);

    info!("Rendered {} charts", paths.len());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plots").join("nested");

        let renderer = ChartRenderer::new(&out, 800_000.0, 0.8).unwrap();

        assert!(out.is_dir());
        assert_eq!(renderer.out_dir(), out.as_path());
    }

    #[test]
    fn test_renderer_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = EdaConfig::builder().heatmap_vmax(0.5).build().unwrap();

        let renderer = ChartRenderer::from_config(&config, dir.path()).unwrap();

        assert_eq!(renderer.vmax, 0.5);
        assert_eq!(renderer.price_axis_max, 800_000.0);
    }
}
