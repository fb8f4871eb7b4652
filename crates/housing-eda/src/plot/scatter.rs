//! Feature against target scatter plot.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Padding on the feature axis, as a share of its range.
const X_PADDING: f64 = 0.05;

/// Feature axis range with padding; widened by one unit when degenerate.
pub fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min <= 0.0 {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * X_PADDING;
    (min - pad, max + pad)
}

pub(crate) fn draw_scatter(
    path: &Path,
    feature: &str,
    target: &str,
    points: &[(f64, f64)],
    pearson: Option<f64>,
    y_max: f64,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = padded_range(points.iter().map(|(x, _)| *x));
    let caption = match pearson {
        Some(r) => format!("{} vs {} (r = {:.3})", feature, target, r),
        None => format!("{} vs {}", feature, target),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(feature)
        .y_desc(target)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 2, BLUE.mix(0.4).filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range([0.0, 100.0, 50.0].into_iter());
        assert_eq!(lo, -5.0);
        assert_eq!(hi, 105.0);
    }

    #[test]
    fn test_padded_range_degenerate() {
        assert_eq!(padded_range([7.0, 7.0].into_iter()), (6.0, 8.0));
        assert_eq!(padded_range(std::iter::empty()), (0.0, 1.0));
    }
}
