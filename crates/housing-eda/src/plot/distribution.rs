//! Histogram of the target with a fitted normal density on top.

use crate::stats::TargetSummary;
use crate::stats::describe::quantile_sorted;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::PI;
use std::path::Path;

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 50;

/// Number of points sampled along the density curve.
const DENSITY_POINTS: usize = 200;

/// Equal-width bins over `[start, start + width * counts.len()]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the values with the Freedman-Diaconis width, capped at
    /// `max_bins`. Falls back to Sturges' rule when the IQR is zero.
    pub fn freedman_diaconis(values: &[f64], max_bins: usize) -> Self {
        if values.is_empty() {
            return Self {
                start: 0.0,
                width: 1.0,
                counts: Vec::new(),
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let range = max - min;

        if range <= 0.0 {
            return Self {
                start: min - 0.5,
                width: 1.0,
                counts: vec![sorted.len()],
            };
        }

        let n = sorted.len() as f64;
        let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
        let bins = if iqr > 0.0 {
            let width = 2.0 * iqr / n.cbrt();
            (range / width).ceil() as usize
        } else {
            n.log2().ceil() as usize + 1
        };
        let bins = bins.clamp(1, max_bins.max(1));
        let width = range / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &sorted {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self {
            start: min,
            width,
            counts,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.width * self.counts.len() as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Normal probability density.
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    if std <= 0.0 {
        return 0.0;
    }
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

pub(crate) fn draw_distribution(
    path: &Path,
    summary: &TargetSummary,
    values: &[f64],
) -> Result<(), Box<dyn Error>> {
    let histogram = Histogram::freedman_diaconis(values, MAX_BINS);

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    // Normal curve scaled from density to counts per bin
    let scale = histogram.total() as f64 * histogram.width;
    let step = (histogram.end() - histogram.start) / (DENSITY_POINTS - 1) as f64;
    let curve: Vec<(f64, f64)> = (0..DENSITY_POINTS)
        .map(|i| {
            let x = histogram.start + i as f64 * step;
            (x, normal_pdf(x, summary.mean, summary.std) * scale)
        })
        .collect();

    let peak = curve
        .iter()
        .map(|(_, y)| *y)
        .fold(histogram.max_count() as f64, f64::max);

    let caption = match summary.skewness {
        Some(skew) => format!("{} distribution (skewness {:.2})", summary.column, skew),
        None => format!("{} distribution", summary.column),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(histogram.start..histogram.end(), 0f64..(peak * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .x_desc(summary.column.as_str())
        .y_desc("Count")
        .draw()?;

    chart.draw_series(histogram.counts.iter().enumerate().map(|(i, &count)| {
        let x0 = histogram.start + i as f64 * histogram.width;
        Rectangle::new(
            [(x0, 0.0), (x0 + histogram.width, count as f64)],
            BLUE.mix(0.5).filled(),
        )
    }))?;

    chart
        .draw_series(LineSeries::new(curve, RED.stroke_width(2)))?
        .label("normal fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
